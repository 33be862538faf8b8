//! JSON-RPC 2.0 protocol types for the harness side of an MCP exchange.
//!
//! The harness only ever plays the client role: it writes requests to a
//! server's stdin and recovers responses from its stdout. Notifications and
//! server-initiated requests are outside its vocabulary, so the types here
//! cover exactly the request/response pair plus the error object.
//!
//! # Example
//!
//! ```rust
//! use mcpvet_core::protocol::{methods, Request, Response, RequestId};
//!
//! let request = Request::new(methods::TOOLS_LIST, RequestId::Number(2));
//!
//! let json = r#"{"jsonrpc": "2.0", "id": 2, "result": {"tools": []}}"#;
//! let response: Response = serde_json::from_str(json).unwrap();
//! assert!(response.is_success());
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The JSON-RPC version string. Always "2.0".
pub const JSONRPC_VERSION: &str = "2.0";

/// The MCP protocol revision the harness advertises during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The MCP method names the harness exercises.
pub mod methods {
    /// The initialize handshake.
    pub const INITIALIZE: &str = "initialize";
    /// Enumerate advertised tools.
    pub const TOOLS_LIST: &str = "tools/list";
    /// Invoke a tool by name.
    pub const TOOLS_CALL: &str = "tools/call";
    /// Enumerate advertised resources.
    pub const RESOURCES_LIST: &str = "resources/list";
    /// Enumerate advertised prompts.
    pub const PROMPTS_LIST: &str = "prompts/list";
}

/// A JSON-RPC request ID.
///
/// Request IDs correlate requests with their responses. A compliant server
/// echoes the caller-assigned ID verbatim; the harness uses this to match
/// responses when more than one request is outstanding in a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID (most common).
    Number(u64),
    /// String request ID.
    String(String),
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// The JSON-RPC version. Always "2.0".
    pub jsonrpc: Cow<'static, str>,
    /// The request ID for correlation.
    pub id: RequestId,
    /// The method to invoke.
    pub method: Cow<'static, str>,
    /// The method parameters, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Request {
    /// Create a new request with no parameters.
    #[must_use]
    pub fn new(method: impl Into<Cow<'static, str>>, id: impl Into<RequestId>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(JSONRPC_VERSION),
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }

    /// Create a new request with parameters.
    #[must_use]
    pub fn with_params(
        method: impl Into<Cow<'static, str>>,
        id: impl Into<RequestId>,
        params: serde_json::Value,
    ) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(JSONRPC_VERSION),
            id: id.into(),
            method: method.into(),
            params: Some(params),
        }
    }

    /// Build the canonical MCP initialize handshake request.
    ///
    /// Advertises [`PROTOCOL_VERSION`], empty capabilities, and the given
    /// client identity.
    #[must_use]
    pub fn initialize(id: impl Into<RequestId>, client_name: &str, client_version: &str) -> Self {
        Self::with_params(
            methods::INITIALIZE,
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": client_name, "version": client_version}
            }),
        )
    }

    /// Build a `tools/list` request.
    #[must_use]
    pub fn tools_list(id: impl Into<RequestId>) -> Self {
        Self::new(methods::TOOLS_LIST, id)
    }

    /// Build a `tools/call` request for the named tool.
    #[must_use]
    pub fn tools_call(
        id: impl Into<RequestId>,
        name: &str,
        arguments: serde_json::Value,
    ) -> Self {
        Self::with_params(
            methods::TOOLS_CALL,
            id,
            serde_json::json!({"name": name, "arguments": arguments}),
        )
    }

    /// Build a `resources/list` request.
    #[must_use]
    pub fn resources_list(id: impl Into<RequestId>) -> Self {
        Self::new(methods::RESOURCES_LIST, id)
    }

    /// Build a `prompts/list` request.
    #[must_use]
    pub fn prompts_list(id: impl Into<RequestId>) -> Self {
        Self::new(methods::PROMPTS_LIST, id)
    }

    /// Serialize this request to a single wire line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A JSON-RPC 2.0 response message.
///
/// A usable response carries exactly one of `result` or `error`. Lines that
/// deserialize with both, or with neither, are not protocol responses and
/// are discarded by the transport (see [`Response::is_well_formed`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The JSON-RPC version. Always "2.0".
    pub jsonrpc: Cow<'static, str>,
    /// The request ID this response corresponds to.
    pub id: RequestId,
    /// The result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// The error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl Response {
    /// Check if this response indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Check if this response indicates an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check that exactly one of `result` / `error` is present.
    ///
    /// A line carrying both (or neither) is not a usable response. Requests
    /// echoed on stdout also land here: they deserialize (serde ignores the
    /// `method` field) but carry neither side of the pair.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.result.is_some() != self.error.is_some()
    }

    /// Look up a field of the result object, if this is a success response.
    #[must_use]
    pub fn result_field(&self, field: &str) -> Option<&serde_json::Value> {
        self.result.as_ref()?.get(field)
    }

    /// The error message, if this is an error response.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// A JSON-RPC error response object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    #[serde(default)]
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
