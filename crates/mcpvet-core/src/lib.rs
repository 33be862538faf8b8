//! # mcpvet-core
//!
//! Core types for the mcpvet conformance harness.
//!
//! This crate provides the foundational building blocks shared by the
//! transport and harness layers:
//!
//! - **Protocol types**: JSON-RPC 2.0 request/response types and the MCP
//!   method vocabulary exercised by the harness
//! - **Capability types**: lenient snapshots of the tools, prompts, and
//!   resources a server advertises
//! - **Report types**: scenario verdicts and schema-lint findings
//!
//! This crate is runtime-agnostic and does not depend on any async runtime.
//!
//! # Example
//!
//! ```rust
//! use mcpvet_core::protocol::{Request, Response};
//!
//! // Build the canonical MCP handshake request
//! let request = Request::initialize(1u64, "mcpvet", "0.2");
//!
//! // Parse a response line recovered from a server's stdout
//! let json = r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05"}}"#;
//! let response: Response = serde_json::from_str(json).unwrap();
//! assert!(response.is_success());
//! ```

pub mod capability;
pub mod protocol;
pub mod report;

pub use capability::{CapabilitySnapshot, Prompt, Resource, Tool};
pub use protocol::{JsonRpcError, Request, RequestId, Response};
pub use report::{Finding, LintReport, Severity, SuiteReport, Verdict};
