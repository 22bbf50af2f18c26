//! Document tab: a selected PDF in, extracted text and summary out.

use std::path::Path;

use tracing::{info, warn};

use super::{failure_message, FlowError, Phase, ValidationError};
use crate::backend::{Backend, NetworkError};
use crate::summary::{DocumentRequest, DocumentResult};

/// The only MIME type accepted for upload
pub const PDF_MIME: &str = "application/pdf";

const FAILURE: &str =
    "Error processing file. Check that the summarization backend is running and accepting files.";

/// A file offered for selection, with the MIME type its source reported.
#[derive(Clone)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCandidate")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a local file, typing it by extension.
    ///
    /// Files without a known extension are sniffed for the `%PDF-` header.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = match mime_guess::from_path(path).first() {
            Some(mime) => mime.essence_str().to_string(),
            None if bytes.starts_with(b"%PDF-") => PDF_MIME.to_string(),
            None => "application/octet-stream".to_string(),
        };

        Ok(Self::new(name, mime_type, bytes))
    }
}

/// The currently selected PDF.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentSummaryFlow {
    selected: Option<SelectedFile>,
    phase: Phase<DocumentResult>,
    /// Set by a rejected selection or submit; the last result stays in `phase`
    validation_error: Option<String>,
    show_error_detail: bool,
}

impl Default for DocumentSummaryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSummaryFlow {
    pub fn new() -> Self {
        Self {
            selected: None,
            phase: Phase::Idle,
            validation_error: None,
            show_error_detail: false,
        }
    }

    /// Append backend error detail to failure messages
    pub fn with_error_detail(mut self, show: bool) -> Self {
        self.show_error_detail = show;
        self
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &Phase<DocumentResult> {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error_message(&self) -> &str {
        self.validation_error
            .as_deref()
            .unwrap_or_else(|| self.phase.error_message())
    }

    /// Extracted text, if the backend returned any
    pub fn extracted_text(&self) -> Option<&str> {
        self.phase
            .result()
            .map(|r| r.extracted_text.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Summary, if the backend returned one
    pub fn summary(&self) -> Option<&str> {
        self.phase
            .result()
            .map(|r| r.summary.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Offer a file for selection.
    ///
    /// Returns `Ok(false)` when ignored because a request is in flight. A
    /// non-PDF clears any previous selection but keeps the last result.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<bool, ValidationError> {
        if self.is_loading() {
            return Ok(false);
        }

        if candidate.mime_type != PDF_MIME {
            warn!(
                file = %candidate.name,
                mime = %candidate.mime_type,
                "rejected non-PDF selection"
            );
            self.selected = None;
            return Err(self.reject(ValidationError::InvalidFileType));
        }

        info!(file = %candidate.name, bytes = candidate.bytes.len(), "selected document");
        self.selected = Some(SelectedFile {
            name: candidate.name,
            bytes: candidate.bytes,
        });
        self.validation_error = None;
        if matches!(self.phase, Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
        Ok(true)
    }

    /// Read a local file and offer it for selection.
    ///
    /// An unreadable path is rejected like a wrong file type.
    pub fn select_path(&mut self, path: &Path) -> Result<bool, ValidationError> {
        if self.is_loading() {
            return Ok(false);
        }

        match FileCandidate::from_path(path) {
            Ok(candidate) => self.select_file(candidate),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read selected file");
                self.selected = None;
                Err(self.reject(ValidationError::Unreadable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }))
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.is_loading() {
            self.selected = None;
        }
    }

    /// Whether the submit trigger is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.selected.is_some()
    }

    /// Validate and enter `Loading`.
    ///
    /// Returns `Ok(None)` while a request is already in flight.
    pub fn begin(&mut self) -> Result<Option<DocumentRequest>, ValidationError> {
        if self.is_loading() {
            return Ok(None);
        }

        let request = match &self.selected {
            Some(file) => DocumentRequest {
                file_name: file.name.clone(),
                mime_type: PDF_MIME.to_string(),
                bytes: file.bytes.clone(),
            },
            None => return Err(self.reject(ValidationError::NoFile)),
        };
        self.validation_error = None;
        self.phase = Phase::Loading;
        Ok(Some(request))
    }

    /// Store the outcome of the request started by `begin`.
    pub fn finish(&mut self, outcome: Result<DocumentResult, NetworkError>) {
        match outcome {
            Ok(result) => {
                if self.phase.settle(Ok(result)) {
                    info!("document summary received");
                } else {
                    warn!("dropping document summary with no request in flight");
                }
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Run one request for the selected file to completion.
    pub async fn submit(&mut self, backend: &Backend) -> Result<(), FlowError> {
        let Some(request) = self.begin()? else {
            return Ok(());
        };

        match backend.summarize_document(&request).await {
            Ok(result) => {
                self.finish(Ok(result));
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err.into())
            }
        }
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        self.validation_error = Some(err.to_string());
        err
    }

    fn fail(&mut self, err: &NetworkError) {
        warn!(error = %err, "document summarization failed");
        let message = failure_message(FAILURE, err, self.show_error_detail);
        if !self.phase.settle(Err(message)) {
            warn!("dropping document summary failure with no request in flight");
        }
    }
}
