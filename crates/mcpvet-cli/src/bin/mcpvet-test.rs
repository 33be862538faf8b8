//! Scenario-suite runner for MCP stdio servers.
//!
//! Usage:
//! ```bash
//! # Test the default containerized server
//! mcpvet-test
//!
//! # Test another image with a shorter timeout and a couple of tool calls
//! mcpvet-test --image my-mcp:dev --timeout 10 \
//!     --call 'find={"query":"BRCA"}' --call info
//!
//! # Test a local binary instead of a container
//! mcpvet-test --command ./my-server --arg --stdio
//! ```
//!
//! Exits 0 iff every scenario passed.

use clap::Parser;
use mcpvet_cli::args::{init_tracing, ServerArgs};
use mcpvet_cli::report::render_suite;
use mcpvet_harness::{ScenarioSuite, ToolCall};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "mcpvet-test",
    about = "Conformance test suite for MCP servers in stdio mode",
    long_about = "Runs the fixed MCP conformance scenarios (handshake, capability \
                  enumeration, tool invocation, error handling) against a server \
                  launched as a subprocess, one fresh subprocess per scenario."
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    /// Tool to invoke in a call scenario: NAME or NAME=ARGS_JSON, repeatable
    #[arg(long = "call", value_parser = parse_tool_call)]
    calls: Vec<ToolCall>,

    /// Verbose output (raw responses, transport debug logging)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_tool_call(raw: &str) -> Result<ToolCall, String> {
    match raw.split_once('=') {
        Some((name, json)) => {
            let arguments: serde_json::Value = serde_json::from_str(json)
                .map_err(|err| format!("arguments for '{name}' are not valid JSON: {err}"))?;
            if !arguments.is_object() {
                return Err(format!("arguments for '{name}' must be a JSON object"));
            }
            Ok(ToolCall::new(name, arguments))
        }
        None => Ok(ToolCall::new(raw, serde_json::json!({}))),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let suite = ScenarioSuite::new(cli.server.server_command(), cli.server.timeout());
    let report = suite.run_all(&cli.calls).await;

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = render_suite(
        &mut stdout,
        cli.server.target_label(),
        cli.server.timeout(),
        &report,
        cli.verbose,
    ) {
        eprintln!("failed to write report: {err}");
        return ExitCode::FAILURE;
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
