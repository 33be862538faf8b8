//! # mcpvet-harness
//!
//! The two drivers that sit on top of the session transport:
//!
//! - [`ScenarioSuite`] runs the fixed list of protocol conformance scenarios
//!   (handshake, capability enumeration, tool invocation, error handling),
//!   each against a fresh server subprocess, and aggregates verdicts.
//! - [`fetch_capabilities`] + [`lint_snapshot`] retrieve the advertised
//!   tool/prompt/resource lists in one session and check every entry against
//!   a declarative rule table, flagging shapes known to break the downstream
//!   client.
//!
//! Scenarios run sequentially in declared order; nothing here is parallel,
//! so subprocess output ordering and cache-volume contention stay trivial to
//! reason about.

pub mod lint;
pub mod scenario;

pub use lint::{fetch_capabilities, lint_snapshot};
pub use scenario::{ScenarioSuite, ToolCall};
