//! Server-selection arguments shared by both binaries.

use clap::Args;
use mcpvet_transport::ServerCommand;
use std::time::Duration;

/// How to launch the server under test.
///
/// The default is the canonical containerized invocation; `--command` is the
/// escape hatch for exercising an uncontainerized server binary directly.
#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Docker image to test
    #[arg(long, default_value = "hgnc-mcp:latest")]
    pub image: String,

    /// Named cache volume mount passed to `docker run -v`
    #[arg(long, default_value = "hgnc-cache:/home/hgnc/.cache/hgnc")]
    pub cache_volume: String,

    /// Launch this program instead of docker (use --arg for its arguments)
    #[arg(long)]
    pub command: Option<String>,

    /// Argument for --command, repeatable
    #[arg(long = "arg", requires = "command", allow_hyphen_values = true)]
    pub command_args: Vec<String>,

    /// Timeout in seconds per test
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl ServerArgs {
    /// The configured server invocation.
    #[must_use]
    pub fn server_command(&self) -> ServerCommand {
        match &self.command {
            Some(program) => ServerCommand::new(program).args(self.command_args.clone()),
            None => ServerCommand::docker_stdio(&self.image, &self.cache_volume),
        }
    }

    /// What the report header should call the server under test.
    #[must_use]
    pub fn target_label(&self) -> &str {
        self.command.as_deref().unwrap_or(&self.image)
    }

    /// The per-test timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Install the tracing subscriber for a binary: diagnostics go to stderr so
/// the report on stdout stays machine-consumable.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
