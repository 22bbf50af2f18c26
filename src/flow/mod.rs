//! Request/response state machines, one per tab.
//!
//! Each flow owns its inputs plus a [`Phase`]. Transitions are split in two:
//! `begin` validates and moves to `Loading`, handing back the request to send,
//! and `finish` stores the outcome. Both are synchronous, so the same flow can
//! be driven inline (`submit`) or from an event loop that runs the request on
//! a background task.

pub mod document;
pub mod text;

pub use document::{DocumentSummaryFlow, FileCandidate, SelectedFile, PDF_MIME};
pub use text::{TextSummaryFlow, MAX_CHARS};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::backend::NetworkError;

/// Local precondition failure; no request was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text to summarize.")]
    EmptyInput,
    #[error("Text is {len} characters; the limit is {max}.")]
    TooLong { len: usize, max: usize },
    #[error("Please select a valid PDF file (.pdf).")]
    InvalidFileType,
    #[error("Please select a file to summarize.")]
    NoFile,
    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Anything a flow can fail with.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Where a flow is in its request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase<T> {
    #[default]
    Idle,
    Loading,
    Success {
        result: T,
        finished_at: DateTime<Local>,
    },
    /// User-facing message
    Failed(String),
}

impl<T> Phase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Phase::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> &str {
        match self {
            Phase::Failed(message) => message,
            _ => "",
        }
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        match self {
            Phase::Success { finished_at, .. } => Some(*finished_at),
            _ => None,
        }
    }

    /// Outcome transition out of `Loading`. Returns false if nothing was in flight.
    fn settle(&mut self, outcome: Result<T, String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match outcome {
            Ok(result) => Phase::Success {
                result,
                finished_at: Local::now(),
            },
            Err(message) => Phase::Failed(message),
        };
        true
    }
}

/// User-facing text for a failed request.
///
/// The generic message is always shown; backend detail only when enabled.
/// Without a backend-supplied detail the error itself is appended.
fn failure_message(generic: &str, err: &NetworkError, show_detail: bool) -> String {
    match (show_detail, err.backend_detail()) {
        (false, _) => generic.to_string(),
        (true, Some(detail)) => format!("{generic} ({detail})"),
        (true, None) => format!("{generic} ({err})"),
    }
}
