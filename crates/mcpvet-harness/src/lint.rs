//! Schema lint: capability retrieval plus a declarative rule table.
//!
//! The rules encode shapes known to break the downstream desktop client.
//! Each rule is (severity, message template, check function); rules run
//! independently per entry, entries in list order, rules in table order, so
//! two runs over the same snapshot produce the identical finding sequence.

use mcpvet_core::capability::{CapabilitySnapshot, Prompt, Resource, Tool};
use mcpvet_core::protocol::{Request, RequestId};
use mcpvet_core::report::{Finding, LintReport, Severity};
use mcpvet_transport::Session;
use serde_json::Value;
use tracing::{debug, warn};

/// Retrieve the three capability lists in a single session: initialize plus
/// the three enumeration requests, correlated by id.
///
/// A transport failure (unstartable server, timeout, I/O fault) yields an
/// empty snapshot; the caller reports "0 tools" rather than crashing.
pub async fn fetch_capabilities(session: &Session) -> CapabilitySnapshot {
    let requests = [
        Request::initialize(1u64, "mcpvet-lint", env!("CARGO_PKG_VERSION")),
        Request::tools_list(2u64),
        Request::prompts_list(3u64),
        Request::resources_list(4u64),
    ];

    let exchange = session.exchange(&requests).await;
    if let Some(reason) = exchange.failure_reason() {
        warn!(%reason, "capability retrieval produced no responses");
    }

    let list = |id: u64, position: usize, field: &str| {
        exchange
            .correlate(&RequestId::Number(id), position)
            .and_then(|response| response.result_field(field))
            .cloned()
    };

    CapabilitySnapshot {
        tools: parse_entries(list(2, 1, "tools"), "tool"),
        prompts: parse_entries(list(3, 2, "prompts"), "prompt"),
        resources: parse_entries(list(4, 3, "resources"), "resource"),
    }
}

/// Parse list entries one by one so a single malformed entry (e.g. a bare
/// string where an object belongs) doesn't discard the rest of the list.
fn parse_entries<T: serde::de::DeserializeOwned>(value: Option<Value>, what: &str) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, what, "skipping unparseable capability entry");
                None
            }
        })
        .collect()
}

/// Check every entry of the snapshot against the rule tables.
#[must_use]
pub fn lint_snapshot(snapshot: &CapabilitySnapshot) -> LintReport {
    let mut findings = Vec::new();
    for tool in &snapshot.tools {
        apply(TOOL_RULES, tool, tool.display_name(), &mut findings);
    }
    for prompt in &snapshot.prompts {
        let subject = format!("Prompt {}", prompt.display_name());
        apply(PROMPT_RULES, prompt, &subject, &mut findings);
    }
    for resource in &snapshot.resources {
        let subject = format!("Resource {}", resource.display_uri());
        apply(RESOURCE_RULES, resource, &subject, &mut findings);
    }
    debug!(findings = findings.len(), "lint complete");
    LintReport { findings }
}

/// One place a rule fired within an entry.
struct RuleHit {
    /// Property path within the entry, when field-level.
    path: Option<String>,
    /// Extra detail appended to the message template.
    detail: Option<String>,
}

impl RuleHit {
    fn entry() -> Self {
        Self {
            path: None,
            detail: None,
        }
    }

    fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            detail: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A declarative lint rule: severity, message template, check.
struct Rule<E> {
    severity: Severity,
    message: &'static str,
    check: fn(&E) -> Vec<RuleHit>,
}

fn apply<E>(rules: &[Rule<E>], entry: &E, subject: &str, findings: &mut Vec<Finding>) {
    for rule in rules {
        for hit in (rule.check)(entry) {
            let message = match hit.detail {
                Some(detail) => format!("{}: {detail}", rule.message),
                None => rule.message.to_string(),
            };
            let mut finding = Finding {
                severity: rule.severity,
                subject: subject.to_string(),
                path: None,
                message,
            };
            if let Some(path) = hit.path {
                finding = finding.at(path);
            }
            findings.push(finding);
        }
    }
}

const TOOL_RULES: &[Rule<Tool>] = &[
    Rule {
        severity: Severity::Blocking,
        message: "'description' must be a string",
        check: tool_description_not_string,
    },
    Rule {
        severity: Severity::Advisory,
        message: "'default' is an empty array - should be null or omitted",
        check: tool_empty_array_default,
    },
    Rule {
        severity: Severity::Blocking,
        message: "'default' contains a malformed array (R c() serialization artifact)",
        check: tool_c_vector_default,
    },
    Rule {
        severity: Severity::Blocking,
        message: "property 'description' must be a string",
        check: tool_property_description_not_string,
    },
];

const PROMPT_RULES: &[Rule<Prompt>] = &[
    Rule {
        severity: Severity::Blocking,
        message: "'description' must be a string",
        check: prompt_description_not_string,
    },
    Rule {
        severity: Severity::Blocking,
        message: "'arguments' must be an array",
        check: prompt_arguments_not_array,
    },
];

const RESOURCE_RULES: &[Rule<Resource>] = &[
    Rule {
        severity: Severity::Blocking,
        message: "required field is missing",
        check: resource_missing_field,
    },
    Rule {
        severity: Severity::Blocking,
        message: "field must be a string",
        check: resource_field_not_string,
    },
];

fn non_string(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_string())
}

fn tool_description_not_string(tool: &Tool) -> Vec<RuleHit> {
    if non_string(tool.description.as_ref()) {
        vec![RuleHit::entry()]
    } else {
        Vec::new()
    }
}

fn tool_empty_array_default(tool: &Tool) -> Vec<RuleHit> {
    tool.schema_properties()
        .filter(|(_, def)| {
            def.get("default")
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty)
        })
        .map(|(prop, _)| RuleHit::at(prop.clone()))
        .collect()
}

/// A non-empty array default whose first element is the single character
/// `"c"` is the signature of an R `c()` call leaking through serialization.
fn tool_c_vector_default(tool: &Tool) -> Vec<RuleHit> {
    tool.schema_properties()
        .filter_map(|(prop, def)| {
            let default = def.get("default")?.as_array()?;
            if default.first()?.as_str()? == "c" {
                Some(RuleHit::at(prop.clone()).detail(
                    serde_json::to_string(default).unwrap_or_else(|_| "[..]".to_string()),
                ))
            } else {
                None
            }
        })
        .collect()
}

fn tool_property_description_not_string(tool: &Tool) -> Vec<RuleHit> {
    tool.schema_properties()
        .filter(|(_, def)| non_string(def.get("description")))
        .map(|(prop, _)| RuleHit::at(prop.clone()))
        .collect()
}

fn prompt_description_not_string(prompt: &Prompt) -> Vec<RuleHit> {
    if non_string(prompt.description.as_ref()) {
        vec![RuleHit::entry()]
    } else {
        Vec::new()
    }
}

fn prompt_arguments_not_array(prompt: &Prompt) -> Vec<RuleHit> {
    if prompt.arguments.as_ref().is_some_and(|a| !a.is_array()) {
        vec![RuleHit::entry()]
    } else {
        Vec::new()
    }
}

fn resource_missing_field(resource: &Resource) -> Vec<RuleHit> {
    resource
        .required_fields()
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| RuleHit::at(field))
        .collect()
}

fn resource_field_not_string(resource: &Resource) -> Vec<RuleHit> {
    resource
        .required_fields()
        .into_iter()
        .filter(|(_, value)| non_string(*value))
        .map(|(field, _)| RuleHit::at(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tool(json: Value) -> Tool {
        serde_json::from_value(json).unwrap()
    }

    fn snapshot_with_tool(json: Value) -> CapabilitySnapshot {
        CapabilitySnapshot {
            tools: vec![tool(json)],
            ..Default::default()
        }
    }

    #[test]
    fn clean_tool_yields_no_findings() {
        let report = lint_snapshot(&snapshot_with_tool(serde_json::json!({
            "name": "find",
            "description": "Search for genes",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "search term"},
                    "limit": {"type": "number", "default": 10}
                }
            }
        })));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn empty_array_default_is_one_advisory() {
        let report = lint_snapshot(&snapshot_with_tool(serde_json::json!({
            "name": "normalize",
            "inputSchema": {"properties": {"symbols": {"default": []}}}
        })));
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.severity, Severity::Advisory);
        assert_eq!(finding.location(), "normalize.symbols");
        assert!(!report.has_blocking());
    }

    #[test]
    fn c_vector_default_is_one_blocking() {
        let report = lint_snapshot(&snapshot_with_tool(serde_json::json!({
            "name": "resolve",
            "inputSchema": {"properties": {"fields": {"default": ["c", "symbol", "name"]}}}
        })));
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.severity, Severity::Blocking);
        assert!(finding.message.contains("R c()"));
        assert!(finding.message.contains("symbol"));
        assert!(report.has_blocking());
    }

    #[test]
    fn null_or_absent_default_is_clean() {
        let report = lint_snapshot(&snapshot_with_tool(serde_json::json!({
            "name": "t",
            "inputSchema": {"properties": {
                "a": {"default": null},
                "b": {"type": "string"}
            }}
        })));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn non_string_descriptions_are_blocking() {
        let report = lint_snapshot(&snapshot_with_tool(serde_json::json!({
            "name": "t",
            "description": {"en": "oops"},
            "inputSchema": {"properties": {"q": {"description": 7}}}
        })));
        assert_eq!(report.findings.len(), 2);
        assert!(report.findings.iter().all(|f| f.severity == Severity::Blocking));
        assert_eq!(report.findings[0].subject, "t");
        assert_eq!(report.findings[1].location(), "t.q");
    }

    #[test]
    fn prompt_rules_flag_bad_shapes() {
        let snapshot = CapabilitySnapshot {
            prompts: vec![
                serde_json::from_value(serde_json::json!({
                    "name": "summarize",
                    "description": ["not", "a", "string"],
                    "arguments": {"oops": true}
                }))
                .unwrap(),
                serde_json::from_value(serde_json::json!({
                    "name": "ok",
                    "description": "fine",
                    "arguments": []
                }))
                .unwrap(),
            ],
            ..Default::default()
        };
        let report = lint_snapshot(&snapshot);
        assert_eq!(report.findings.len(), 2);
        assert!(report
            .findings
            .iter()
            .all(|f| f.subject == "Prompt summarize"));
    }

    #[test]
    fn resource_missing_mime_type_is_one_blocking_naming_uri_and_field() {
        let snapshot = CapabilitySnapshot {
            resources: vec![serde_json::from_value(serde_json::json!({
                "uri": "hgnc://info",
                "name": "info"
            }))
            .unwrap()],
            ..Default::default()
        };
        let report = lint_snapshot(&snapshot);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.severity, Severity::Blocking);
        assert_eq!(finding.subject, "Resource hgnc://info");
        assert_eq!(finding.path.as_deref(), Some("mimeType"));
    }

    #[test]
    fn resource_non_string_field_is_blocking() {
        let snapshot = CapabilitySnapshot {
            resources: vec![serde_json::from_value(serde_json::json!({
                "uri": "hgnc://info",
                "name": "info",
                "mimeType": 12
            }))
            .unwrap()],
            ..Default::default()
        };
        let report = lint_snapshot(&snapshot);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].path.as_deref(), Some("mimeType"));
        assert!(report.findings[0].message.contains("must be a string"));
    }

    #[test]
    fn lint_is_idempotent_over_a_snapshot() {
        let snapshot = CapabilitySnapshot {
            tools: vec![
                tool(serde_json::json!({
                    "name": "a",
                    "inputSchema": {"properties": {"x": {"default": []}, "y": {"default": ["c", "z"]}}}
                })),
                tool(serde_json::json!({"name": "b", "description": 1})),
            ],
            ..Default::default()
        };
        let first = lint_snapshot(&snapshot);
        let second = lint_snapshot(&snapshot);
        let render = |report: &LintReport| {
            report
                .findings
                .iter()
                .map(|f| format!("{:?} {} {}", f.severity, f.location(), f.message))
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
        assert_eq!(first.findings.len(), 3);
    }

    #[test]
    fn unparseable_entries_are_skipped_not_fatal() {
        let entries = parse_entries::<Tool>(
            Some(serde_json::json!([{"name": "good"}, "just a string", {"name": "also good"}])),
            "tool",
        );
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn non_array_list_yields_no_entries() {
        let entries = parse_entries::<Tool>(Some(serde_json::json!({"oops": true})), "tool");
        assert!(entries.is_empty());
        let entries = parse_entries::<Tool>(None, "tool");
        assert!(entries.is_empty());
    }
}
