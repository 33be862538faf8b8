//! Named conformance scenarios and the fixed suite that runs them.
//!
//! Every scenario builds its own request batch and runs it in a fresh
//! subprocess; no scenario observes another's server state. A scenario never
//! panics on a misbehaving server — fewer responses than expected, error
//! responses, timeouts, and unstartable processes all become failed verdicts
//! with a diagnostic.

use mcpvet_core::protocol::{Request, RequestId};
use mcpvet_core::report::{SuiteReport, Verdict};
use mcpvet_transport::{Exchange, ServerCommand, Session};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::info;

/// Client identity advertised in the initialize handshake.
const CLIENT_NAME: &str = "mcpvet";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One tool invocation to exercise in the scenario run.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Tool name as advertised by the server.
    pub name: String,
    /// Arguments object passed to the tool.
    pub arguments: Value,
}

impl ToolCall {
    /// A tool call with the given arguments object.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The conformance scenario suite for one server invocation.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use mcpvet_harness::{ScenarioSuite, ToolCall};
/// use mcpvet_transport::ServerCommand;
///
/// # async fn example() {
/// let suite = ScenarioSuite::new(
///     ServerCommand::docker_stdio("hgnc-mcp:latest", "hgnc-cache:/home/hgnc/.cache/hgnc"),
///     Duration::from_secs(30),
/// );
/// let report = suite
///     .run_all(&[ToolCall::new("find", serde_json::json!({"query": "BRCA"}))])
///     .await;
/// assert!(report.total() >= 5);
/// # }
/// ```
#[derive(Debug)]
pub struct ScenarioSuite {
    session: Session,
}

impl ScenarioSuite {
    /// Create a suite that launches `command` with the given per-scenario
    /// timeout.
    #[must_use]
    pub fn new(command: ServerCommand, timeout: Duration) -> Self {
        Self {
            session: Session::new(command, timeout),
        }
    }

    /// Initialize handshake: a response must exist whose result carries a
    /// protocol version.
    pub async fn initialize(&self) -> Verdict {
        let name = "MCP Initialize";
        let requests = [Request::initialize(1u64, CLIENT_NAME, CLIENT_VERSION)];

        let start = Instant::now();
        let exchange = self.session.exchange(&requests).await;
        let elapsed = start.elapsed();

        let Some(response) = exchange.correlate(&RequestId::Number(1), 0) else {
            return Verdict::fail(name, missing_step(&exchange, "initialize"), elapsed, None);
        };
        match response
            .result_field("protocolVersion")
            .and_then(Value::as_str)
        {
            Some(version) => Verdict::pass(
                name,
                format!("Protocol version: {version}"),
                elapsed,
                Some(response.clone()),
            ),
            None => Verdict::fail(
                name,
                "No valid initialize response",
                elapsed,
                Some(response.clone()),
            ),
        }
    }

    /// `tools/list` after a handshake: the follow-up response must carry a
    /// tools array (possibly empty).
    pub async fn list_tools(&self) -> Verdict {
        self.list_scenario("List Tools", Request::tools_list(2u64), "tools")
            .await
    }

    /// `resources/list` after a handshake.
    pub async fn list_resources(&self) -> Verdict {
        self.list_scenario("List Resources", Request::resources_list(2u64), "resources")
            .await
    }

    /// `prompts/list` after a handshake.
    pub async fn list_prompts(&self) -> Verdict {
        self.list_scenario("List Prompts", Request::prompts_list(2u64), "prompts")
            .await
    }

    /// Shared shape of the three enumeration scenarios: handshake plus one
    /// list request; pass iff the second response has a `field` array.
    async fn list_scenario(&self, name: &str, request: Request, field: &'static str) -> Verdict {
        let method = request.method.clone();
        let follow_up = request.id.clone();
        let requests = [
            Request::initialize(1u64, CLIENT_NAME, CLIENT_VERSION),
            request,
        ];

        let start = Instant::now();
        let exchange = self.session.exchange(&requests).await;
        let elapsed = start.elapsed();

        let Some(response) = exchange.correlate(&follow_up, 1) else {
            return Verdict::fail(name, missing_step(&exchange, &method), elapsed, None);
        };
        match response.result_field(field).and_then(Value::as_array) {
            Some(entries) => Verdict::pass(
                name,
                format!("Found {} {field}", entries.len()),
                elapsed,
                Some(response.clone()),
            ),
            None => Verdict::fail(
                name,
                format!("{method} response has no {field} list"),
                elapsed,
                Some(response.clone()),
            ),
        }
    }

    /// `tools/call` after a handshake. A result passes; an error object is a
    /// valid protocol exchange but a failed outcome, reported with the
    /// server's message; a missing response is a distinct failure.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Verdict {
        let scenario = format!("Call Tool: {name}");
        let requests = [
            Request::initialize(1u64, CLIENT_NAME, CLIENT_VERSION),
            Request::tools_call(2u64, name, arguments.clone()),
        ];

        let start = Instant::now();
        let exchange = self.session.exchange(&requests).await;
        let elapsed = start.elapsed();

        let Some(response) = exchange.correlate(&RequestId::Number(2), 1) else {
            return Verdict::fail(
                scenario,
                missing_step(&exchange, "tools/call"),
                elapsed,
                None,
            );
        };
        if response.is_success() {
            Verdict::pass(
                scenario,
                "Tool executed successfully",
                elapsed,
                Some(response.clone()),
            )
        } else {
            let message = response.error_message().unwrap_or("Unknown");
            Verdict::fail(
                scenario,
                format!("Tool error: {message}"),
                elapsed,
                Some(response.clone()),
            )
        }
    }

    /// A request with an unrecognized method must come back as an error
    /// object, not silence and not a result.
    pub async fn invalid_method(&self) -> Verdict {
        let name = "Invalid Method Error Handling";
        let requests = [Request::with_params(
            "invalid/method",
            99u64,
            serde_json::json!({}),
        )];

        let start = Instant::now();
        let exchange = self.session.exchange(&requests).await;
        let elapsed = start.elapsed();

        let response = exchange.correlate(&RequestId::Number(99), 0);
        match response.and_then(|r| r.error_message()) {
            Some(message) => {
                let message = format!("Correctly returned error: {message}");
                Verdict::pass(name, message, elapsed, response.cloned())
            }
            None => Verdict::fail(
                name,
                "Did not return error for invalid method",
                elapsed,
                response.cloned(),
            ),
        }
    }

    /// Run the fixed, ordered scenario list to completion regardless of
    /// individual failures: handshake, the three enumerations, each
    /// configured tool call, then the invalid-method probe.
    pub async fn run_all(&self, calls: &[ToolCall]) -> SuiteReport {
        let mut verdicts = vec![
            self.initialize().await,
            self.list_tools().await,
            self.list_resources().await,
            self.list_prompts().await,
        ];
        for call in calls {
            verdicts.push(self.call_tool(&call.name, &call.arguments).await);
        }
        verdicts.push(self.invalid_method().await);

        for verdict in &verdicts {
            info!(
                scenario = %verdict.name,
                passed = verdict.passed,
                elapsed_ms = verdict.elapsed.as_millis() as u64,
                "scenario finished"
            );
        }
        SuiteReport { verdicts }
    }
}

/// Diagnostic for a scenario that got fewer responses than expected, naming
/// the step whose response is missing and the transport-level reason if any.
fn missing_step(exchange: &Exchange, step: &str) -> String {
    match exchange.failure_reason() {
        Some(reason) => format!("No response to {step} ({reason})"),
        None => format!("No response to {step}"),
    }
}
