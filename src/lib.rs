//! # Crux
//!
//! A TUI client for a remote summarization backend.
//!
//! ## Features
//!
//! - **Two flows**: paste text or pick a PDF, each with its own request cycle
//! - **Injected transport**: flows talk to a `Transport` trait, so they run against
//!   reqwest in production and an in-memory fake in tests
//! - **Terminal UI**: ratatui front-end plus one-shot `text` / `document` commands

pub mod backend;
pub mod config;
pub mod flow;
pub mod logging;
pub mod summary;
pub mod transport;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;

pub use backend::{Backend, NetworkError};
pub use config::Config;
pub use flow::{DocumentSummaryFlow, FlowError, TextSummaryFlow, ValidationError};
pub use summary::{DocumentRequest, DocumentResult, TextRequest, TextResult};
