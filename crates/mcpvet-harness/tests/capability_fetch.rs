//! End-to-end capability retrieval against scripted fake servers.

use mcpvet_harness::{fetch_capabilities, lint_snapshot};
use mcpvet_transport::{ServerCommand, Session};
use std::time::Duration;

fn scripted(script: &str) -> Session {
    Session::new(
        ServerCommand::new("sh").args(["-c", script]),
        Duration::from_secs(10),
    )
}

#[tokio::test]
async fn snapshot_collects_all_three_lists_by_id() {
    // Responses arrive out of request order; correlation is by id.
    let session = scripted(concat!(
        "cat > /dev/null; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"protocolVersion\":\"2024-11-05\"}}'; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":4,\"result\":{\"resources\":[{\"uri\":\"hgnc://info\",\"name\":\"info\",\"mimeType\":\"application/json\"}]}}'; ",
        "echo 'cache warmed' >&2; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[{\"name\":\"find\"},{\"name\":\"resolve\"}]}}'; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{\"prompts\":[]}}'",
    ));

    let snapshot = fetch_capabilities(&session).await;
    assert_eq!(snapshot.tools.len(), 2);
    assert_eq!(snapshot.tools[0].display_name(), "find");
    assert_eq!(snapshot.prompts.len(), 0);
    assert_eq!(snapshot.resources.len(), 1);
    assert!(!snapshot.is_empty());

    let report = lint_snapshot(&snapshot);
    assert!(report.findings.is_empty());
}

#[tokio::test]
async fn malformed_schema_survives_fetch_and_is_flagged() {
    let session = scripted(concat!(
        "cat > /dev/null; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"protocolVersion\":\"2024-11-05\"}}'; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[",
        "{\"name\":\"normalize\",\"inputSchema\":{\"properties\":{\"symbols\":{\"default\":[\"c\",\"symbol\"]}}}}",
        "]}}'; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{\"prompts\":[]}}'; ",
        "echo '{\"jsonrpc\":\"2.0\",\"id\":4,\"result\":{\"resources\":[]}}'",
    ));

    let snapshot = fetch_capabilities(&session).await;
    let report = lint_snapshot(&snapshot);
    assert!(report.has_blocking());
    assert_eq!(report.blocking_count(), 1);
    assert_eq!(report.findings[0].location(), "normalize.symbols");
}

#[tokio::test]
async fn unstartable_server_yields_empty_snapshot() {
    let session = Session::new(
        ServerCommand::new("mcpvet-no-such-binary-11111"),
        Duration::from_secs(1),
    );
    let snapshot = fetch_capabilities(&session).await;
    assert!(snapshot.is_empty());
    assert!(!lint_snapshot(&snapshot).has_blocking());
}
