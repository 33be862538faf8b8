//! Server invocation configuration.
//!
//! The harness never hardcodes how the server is launched; callers supply a
//! [`ServerCommand`] built either from the canonical docker invocation or
//! from an arbitrary program + args.

use crate::error::TransportError;
use std::process::Stdio;
use tokio::process::Child;

/// The command used to launch one server subprocess.
///
/// # Example
///
/// ```rust
/// use mcpvet_transport::ServerCommand;
///
/// // The canonical containerized invocation
/// let docker = ServerCommand::docker_stdio("hgnc-mcp:latest", "hgnc-cache:/home/hgnc/.cache/hgnc");
///
/// // Or any local binary that speaks stdio MCP
/// let local = ServerCommand::new("my-server").arg("--stdio").env("LOG_LEVEL", "debug");
/// ```
#[derive(Debug, Clone)]
pub struct ServerCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl ServerCommand {
    /// Create a command for the given program.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// The canonical invocation: run the server image in a disposable
    /// container with stdio transport and the shared cache volume mounted.
    #[must_use]
    pub fn docker_stdio(image: &str, cache_volume: &str) -> Self {
        Self::new("docker").args(["run", "--rm", "-i", "-v", cache_volume, image, "--stdio"])
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The full command line, for diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Spawn the child with all three stdio streams piped.
    ///
    /// `kill_on_drop` is set so an abandoned exchange cannot leak the child.
    pub(crate) fn spawn(&self) -> Result<Child, TransportError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &self.envs {
            command.env(key, value);
        }

        command.spawn().map_err(|source| TransportError::Spawn {
            program: self.program.clone(),
            source,
        })
    }
}
