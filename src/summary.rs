//! Request and result records exchanged with the summarization backend.

use serde::{Deserialize, Serialize};

/// Text summarization request, sent as `{"text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRequest {
    #[serde(rename = "text")]
    pub content: String,
}

/// Text summarization result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    #[serde(default)]
    pub summary: String,
}

/// A PDF ready to upload as the `file` part of a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DocumentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRequest")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Document summarization result.
///
/// Either field may be missing or empty; only populated fields are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub summary: String,
}

impl DocumentResult {
    /// Check if the result has anything to show
    pub fn is_empty(&self) -> bool {
        self.extracted_text.is_empty() && self.summary.is_empty()
    }
}

/// Error body a failing backend may return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The most specific detail available, `message` first.
    pub fn detail(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|s| !s.trim().is_empty())
    }
}
