//! Schema linter for MCP stdio servers.
//!
//! Fetches the advertised tool/prompt/resource lists in one session and
//! checks every entry for shapes known to break the downstream client.
//!
//! Usage:
//! ```bash
//! mcpvet-lint --image my-mcp:dev
//! mcpvet-lint --json > findings.json
//! ```
//!
//! Exits 1 iff any blocking finding exists; advisory-only runs exit 0.

use clap::Parser;
use mcpvet_cli::args::{init_tracing, ServerArgs};
use mcpvet_cli::report::render_lint;
use mcpvet_harness::{fetch_capabilities, lint_snapshot};
use mcpvet_transport::Session;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "mcpvet-lint",
    about = "Validate MCP server schemas for client compatibility"
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    /// Emit the findings as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Verbose output (transport debug logging)
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = Session::new(cli.server.server_command(), cli.server.timeout());
    let snapshot = fetch_capabilities(&session).await;
    let report = lint_snapshot(&snapshot);

    let mut stdout = std::io::stdout().lock();
    let rendered = if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &report)
            .map_err(std::io::Error::other)
            .and_then(|()| {
                use std::io::Write;
                writeln!(stdout)
            })
    } else {
        render_lint(
            &mut stdout,
            cli.server.target_label(),
            &snapshot,
            &report,
        )
    };
    if let Err(err) = rendered {
        eprintln!("failed to write report: {err}");
        return ExitCode::FAILURE;
    }

    if report.has_blocking() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
