//! Transport error types.
//!
//! These never escape the transport boundary as `Err`: a failed exchange is
//! still an [`Exchange`](crate::Exchange) value, with the failure recorded
//! on it for diagnostics.

use thiserror::Error;

/// Errors that can occur while running a session exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server subprocess could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// A stdio handle could not be captured from the child.
    #[error("failed to capture child {stream}")]
    StreamCapture {
        /// Which stream was missing.
        stream: &'static str,
    },

    /// Stdio communication raised an I/O fault.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request could not be serialized to a wire line.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_names_the_program() {
        let err = TransportError::Spawn {
            program: "docker".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("docker"));
    }
}
