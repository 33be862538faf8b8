//! # mcpvet-cli
//!
//! Shared plumbing for the two mcpvet binaries: server-selection arguments
//! and the report layer that renders verdicts and findings to a stream.
//!
//! The report layer is deliberately dumb: it reads the immutable report
//! types from `mcpvet-core` and derives nothing but text and an exit status.

pub mod args;
pub mod report;
