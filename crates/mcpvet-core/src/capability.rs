//! Capability entry types: what a server advertised in one session.
//!
//! These are deliberately lenient snapshots. The schema validator's whole job
//! is to flag entries whose fields have the wrong JSON type, so the fields it
//! type-checks are held as raw [`serde_json::Value`] rather than as typed
//! strings — a malformed server must be observable, not a parse error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn display_name(value: &Value) -> &str {
    value.as_str().unwrap_or("unknown")
}

/// A tool definition advertised via `tools/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name. Kept raw; [`Tool::display_name`] falls back to "unknown".
    #[serde(default)]
    pub name: Value,
    /// Advertised description, if any. May be any JSON type on a broken server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// JSON Schema for the tool's input, if any.
    #[serde(rename = "inputSchema", default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    /// The tool name as text, or "unknown" when absent or non-string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }

    /// Iterate the declared properties of the input schema, if it has any.
    pub fn schema_properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.input_schema
            .as_ref()
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
    }
}

/// A prompt definition advertised via `prompts/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prompt {
    /// Prompt name.
    #[serde(default)]
    pub name: Value,
    /// Advertised description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Declared arguments, if any. Must be an array on a compliant server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl Prompt {
    /// The prompt name as text, or "unknown" when absent or non-string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

/// A resource definition advertised via `resources/list`.
///
/// `uri`, `name`, and `mimeType` are all required by the downstream client;
/// they are kept optional here so the validator can report which are missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Resource URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<Value>,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// MIME type of the resource content.
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<Value>,
}

impl Resource {
    /// The resource URI as text, or "unknown" when absent or non-string.
    #[must_use]
    pub fn display_uri(&self) -> &str {
        self.uri.as_ref().map_or("unknown", display_name)
    }

    /// The required fields in their declared order, for rule iteration.
    #[must_use]
    pub fn required_fields(&self) -> [(&'static str, Option<&Value>); 3] {
        [
            ("uri", self.uri.as_ref()),
            ("name", self.name.as_ref()),
            ("mimeType", self.mime_type.as_ref()),
        ]
    }
}

/// The three capability lists obtained from a single session.
///
/// Entries are read-only snapshots; nothing in the harness mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    /// Tools advertised via `tools/list`.
    pub tools: Vec<Tool>,
    /// Prompts advertised via `prompts/list`.
    pub prompts: Vec<Prompt>,
    /// Resources advertised via `resources/list`.
    pub resources: Vec<Resource>,
}

impl CapabilitySnapshot {
    /// True when the server advertised nothing (or the session failed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.prompts.is_empty() && self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tool_parses_leniently() {
        // A numeric description must survive parsing so the linter can flag it.
        let tool: Tool = serde_json::from_value(serde_json::json!({
            "name": "find",
            "description": 42,
            "inputSchema": {"type": "object", "properties": {"query": {"type": "string"}}}
        }))
        .unwrap();
        assert_eq!(tool.display_name(), "find");
        assert!(tool.description.as_ref().is_some_and(|d| !d.is_string()));
        assert_eq!(tool.schema_properties().count(), 1);
    }

    #[test]
    fn nameless_tool_displays_unknown() {
        let tool: Tool = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(tool.display_name(), "unknown");
        assert_eq!(tool.schema_properties().count(), 0);
    }

    #[test]
    fn resource_reports_missing_fields() {
        let resource: Resource =
            serde_json::from_value(serde_json::json!({"uri": "hgnc://info", "name": "info"}))
                .unwrap();
        assert_eq!(resource.display_uri(), "hgnc://info");
        let missing: Vec<&str> = resource
            .required_fields()
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(f, _)| *f)
            .collect();
        assert_eq!(missing, vec!["mimeType"]);
    }
}
