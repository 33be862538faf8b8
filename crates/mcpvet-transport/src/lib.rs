//! # mcpvet-transport
//!
//! The session transport: one subprocess lifetime carrying one ordered batch
//! of JSON-RPC requests and the responses recovered from its output.
//!
//! A [`Session`] spawns the server under test, writes the whole request batch
//! to its stdin as newline-delimited JSON, closes stdin to signal
//! end-of-input, drains stdout and stderr to completion, and reaps the child.
//! The entire exchange is bounded by a single wall-clock timeout; on timeout
//! the child is killed and the exchange reports zero responses.
//!
//! Output recovery is deliberately tolerant: servers routinely interleave log
//! lines with protocol output, so each stdout line is considered a response
//! only if it looks like one (`{` prefix, `"jsonrpc"` marker) and actually
//! decodes as one. Everything else is skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use mcpvet_core::protocol::Request;
//! use mcpvet_transport::{ServerCommand, Session};
//!
//! # async fn example() {
//! let command = ServerCommand::docker_stdio("hgnc-mcp:latest", "hgnc-cache:/home/hgnc/.cache/hgnc");
//! let session = Session::new(command, Duration::from_secs(30));
//!
//! let exchange = session
//!     .exchange(&[Request::initialize(1u64, "mcpvet", "0.2")])
//!     .await;
//! assert!(exchange.responses.len() <= 1);
//! # }
//! ```

pub mod command;
pub mod error;
pub mod session;

pub use command::ServerCommand;
pub use error::TransportError;
pub use session::{Exchange, Session};
