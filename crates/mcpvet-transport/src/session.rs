//! One subprocess lifetime, one batch exchange.
//!
//! The exchange protocol is write-everything-then-read-everything: the server
//! under test accepts its whole input up front and is expected to terminate
//! once stdin closes, so a session needs exactly one suspension point. The
//! child is always reaped (waited or killed) before `exchange` returns.

use crate::command::ServerCommand;
use crate::error::TransportError;
use mcpvet_core::protocol::{Request, RequestId, Response};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Child;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A single-subprocess JSON-RPC session.
///
/// Each call to [`Session::exchange`] spawns a fresh subprocess; no state
/// survives between exchanges. Scenarios that must not observe each other's
/// server state simply use separate exchanges.
#[derive(Debug, Clone)]
pub struct Session {
    command: ServerCommand,
    timeout: Duration,
}

impl Session {
    /// Create a session that launches `command` and bounds each exchange by
    /// `timeout` of wall-clock time.
    #[must_use]
    pub fn new(command: ServerCommand, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// The configured server invocation, for diagnostics.
    #[must_use]
    pub fn command(&self) -> &ServerCommand {
        &self.command
    }

    /// Run one batch exchange: write all `requests` as newline-delimited
    /// JSON, close stdin, and collect every JSON-RPC response line the
    /// server emits before exiting or the timeout fires.
    ///
    /// This never fails past the transport boundary. A subprocess that could
    /// not be started, timed out, or raised an I/O fault yields an
    /// [`Exchange`] with zero responses and the failure recorded on it.
    pub async fn exchange(&self, requests: &[Request]) -> Exchange {
        let batch = match serialize_batch(requests) {
            Ok(batch) => batch,
            Err(err) => return Exchange::failed(err),
        };

        let mut child = match self.command.spawn() {
            Ok(child) => child,
            Err(err) => return Exchange::failed(err),
        };

        let deadline = Instant::now() + self.timeout;
        match drive_child(&mut child, batch, deadline).await {
            Ok(Some((stdout, stderr))) => {
                let responses = scan_responses(&stdout);
                debug!(
                    responses = responses.len(),
                    stderr_bytes = stderr.len(),
                    "session exchange complete"
                );
                Exchange {
                    responses,
                    stderr,
                    timed_out: false,
                    failure: None,
                }
            }
            Ok(None) => {
                warn!(command = %self.command.display(), timeout = ?self.timeout, "session timed out, killing server");
                reap(&mut child).await;
                Exchange::timed_out()
            }
            Err(err) => {
                reap(&mut child).await;
                Exchange::failed(err)
            }
        }
    }
}

/// Serialize the batch: one JSON line per request, final newline included.
fn serialize_batch(requests: &[Request]) -> Result<String, TransportError> {
    let mut batch = String::new();
    for request in requests {
        batch.push_str(&request.to_line()?);
        batch.push('\n');
    }
    Ok(batch)
}

/// Write the batch, drain both output streams, and wait for exit, all before
/// `deadline`. Returns `Ok(None)` on deadline expiry; the caller kills.
async fn drive_child(
    child: &mut Child,
    batch: String,
    deadline: Instant,
) -> Result<Option<(String, String)>, TransportError> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or(TransportError::StreamCapture { stream: "stdin" })?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or(TransportError::StreamCapture { stream: "stdout" })?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or(TransportError::StreamCapture { stream: "stderr" })?;

    let io = async move {
        // Input is fully written and closed before anything is read; dropping
        // the handle delivers EOF, which is the server's signal to finish.
        stdin.write_all(batch.as_bytes()).await?;
        stdin.shutdown().await?;
        drop(stdin);

        // Both streams are drained concurrently; draining only one can
        // deadlock a child blocked writing to the other.
        let mut out = Vec::new();
        let mut err = Vec::new();
        let (out_read, err_read) =
            tokio::join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err));
        out_read?;
        err_read?;

        Ok::<_, TransportError>((
            String::from_utf8_lossy(&out).into_owned(),
            String::from_utf8_lossy(&err).into_owned(),
        ))
    };

    let streams = match tokio::time::timeout_at(deadline, io).await {
        Ok(streams) => streams?,
        Err(_) => return Ok(None),
    };

    // Streams are closed; the server should be gone. A child that keeps
    // running with closed stdio still counts against the same deadline.
    match tokio::time::timeout_at(deadline, child.wait()).await {
        Ok(status) => {
            status?;
            Ok(Some(streams))
        }
        Err(_) => Ok(None),
    }
}

/// Kill and reap the child. Errors are irrelevant here: either the process is
/// already gone or the kill succeeded.
async fn reap(child: &mut Child) {
    let _ = child.kill().await;
}

/// Recover JSON-RPC responses from captured stdout.
///
/// A line is considered only if it starts with `{` and contains the protocol
/// tag marker; lines that fail to decode, and decoded objects that do not
/// carry exactly one of result/error, are skipped. Output order is preserved.
fn scan_responses(stdout: &str) -> Vec<Response> {
    let mut responses = Vec::new();
    for line in stdout.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') || !trimmed.contains("\"jsonrpc\"") {
            continue;
        }
        match serde_json::from_str::<Response>(trimmed) {
            Ok(response) if response.is_well_formed() => responses.push(response),
            Ok(_) => debug!(line = %preview(trimmed), "skipping non-response JSON-RPC line"),
            Err(err) => debug!(line = %preview(trimmed), %err, "skipping undecodable line"),
        }
    }
    responses
}

fn preview(line: &str) -> String {
    line.chars().take(120).collect()
}

/// The outcome of one session exchange.
///
/// Responses appear in the order the server emitted them. Stderr is captured
/// verbatim for diagnostics and never parsed as protocol data.
#[derive(Debug)]
pub struct Exchange {
    /// Responses recovered from stdout, in output order.
    pub responses: Vec<Response>,
    /// Everything the server wrote to stderr.
    pub stderr: String,
    /// True when the exchange hit its wall-clock timeout.
    pub timed_out: bool,
    /// The transport failure, when the exchange could not run at all.
    pub failure: Option<TransportError>,
}

impl Exchange {
    fn timed_out() -> Self {
        Self {
            responses: Vec::new(),
            stderr: String::new(),
            timed_out: true,
            failure: None,
        }
    }

    fn failed(failure: TransportError) -> Self {
        Self {
            responses: Vec::new(),
            stderr: String::new(),
            timed_out: false,
            failure: Some(failure),
        }
    }

    /// Look up the response whose `id` matches, if the server echoed it.
    #[must_use]
    pub fn response_for(&self, id: &RequestId) -> Option<&Response> {
        self.responses.iter().find(|r| r.id == *id)
    }

    /// Correlate a response to a request: by echoed id first, falling back to
    /// output position for servers that mis-echo ids.
    #[must_use]
    pub fn correlate(&self, id: &RequestId, position: usize) -> Option<&Response> {
        self.response_for(id).or_else(|| self.responses.get(position))
    }

    /// A one-line description of why the exchange produced nothing, if it
    /// failed at the transport level.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        if self.timed_out {
            Some("session timed out".to_string())
        } else {
            self.failure.as_ref().map(ToString::to_string)
        }
    }
}
