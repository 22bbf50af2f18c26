//! Text tab: pasted text in, summary out.

use tracing::{info, warn};

use super::{failure_message, FlowError, Phase, ValidationError};
use crate::backend::{Backend, NetworkError};
use crate::summary::{TextRequest, TextResult};

/// Character cap on submitted text
pub const MAX_CHARS: usize = 5000;

const FAILURE: &str = "Failed to summarize text. Check that the summarization backend is reachable.";

#[derive(Debug, Clone)]
pub struct TextSummaryFlow {
    content: String,
    phase: Phase<TextResult>,
    /// Set when `begin` rejects the input; the last result stays in `phase`
    validation_error: Option<String>,
    show_error_detail: bool,
}

impl Default for TextSummaryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSummaryFlow {
    pub fn new() -> Self {
        Self {
            content: String::new(),
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

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn phase(&self) -> &Phase<TextResult> {
        &self.phase
    }

    pub fn summary(&self) -> &str {
        self.phase.result().map(|r| r.summary.as_str()).unwrap_or("")
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error_message(&self) -> &str {
        self.validation_error
            .as_deref()
            .unwrap_or_else(|| self.phase.error_message())
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Above 90% of the cap
    pub fn near_limit(&self) -> bool {
        self.char_count() * 10 > MAX_CHARS * 9
    }

    /// Replace the text, dropping anything past the cap.
    pub fn set_content(&mut self, content: &str) {
        self.content = content.chars().take(MAX_CHARS).collect();
    }

    /// Type one character. Refused once the cap is reached.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.char_count() >= MAX_CHARS {
            return false;
        }
        self.content.push(c);
        true
    }

    pub fn pop_char(&mut self) {
        self.content.pop();
    }

    pub fn clear_content(&mut self) {
        self.content.clear();
    }

    /// Whether the submit trigger is enabled.
    ///
    /// Whitespace-only text still enables it; `begin` rejects that case with
    /// a message instead of silently doing nothing.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.content.is_empty()
    }

    /// Validate and enter `Loading`.
    ///
    /// Returns `Ok(None)` while a request is already in flight. A rejected
    /// input leaves the previous summary in place.
    pub fn begin(&mut self) -> Result<Option<TextRequest>, ValidationError> {
        if self.is_loading() {
            return Ok(None);
        }

        if let Err(err) = self.validate() {
            self.validation_error = Some(err.to_string());
            return Err(err);
        }

        self.validation_error = None;
        self.phase = Phase::Loading;
        Ok(Some(TextRequest {
            content: self.content.clone(),
        }))
    }

    /// Store the outcome of the request started by `begin`.
    pub fn finish(&mut self, outcome: Result<TextResult, NetworkError>) {
        match outcome {
            Ok(result) => {
                if self.phase.settle(Ok(result)) {
                    info!("text summary received");
                } else {
                    warn!("dropping text summary with no request in flight");
                }
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Set the text and run one request to completion.
    ///
    /// The outcome is recorded in the flow state either way; the returned
    /// error mirrors it for callers that need to branch on failure.
    pub async fn submit(&mut self, content: &str, backend: &Backend) -> Result<(), FlowError> {
        if self.is_loading() {
            return Ok(());
        }
        self.content = content.to_string();

        let Some(request) = self.begin()? else {
            return Ok(());
        };

        match backend.summarize_text(&request).await {
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

    fn fail(&mut self, err: &NetworkError) {
        warn!(error = %err, "text summarization failed");
        let message = failure_message(FAILURE, err, self.show_error_detail);
        if !self.phase.settle(Err(message)) {
            warn!("dropping text summary failure with no request in flight");
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        let len = self.char_count();
        if len > MAX_CHARS {
            return Err(ValidationError::TooLong {
                len,
                max: MAX_CHARS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn backend_with(transport: &Arc<RecordingTransport>) -> Backend {
        Backend::new(transport.clone())
    }

    #[tokio::test]
    async fn whitespace_input_makes_no_request() {
        let transport = Arc::new(RecordingTransport::new());
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();

        let err = flow.submit("   \n\t ", &backend).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::EmptyInput)
        ));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(flow.error_message(), "Please enter some text to summarize.");
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn successful_submission_stores_summary() {
        let transport = Arc::new(RecordingTransport::new().reply_json(200, json!({"summary": "hi"})));
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();

        flow.submit("hello world", &backend).await.unwrap();

        assert_eq!(flow.summary(), "hi");
        assert_eq!(flow.error_message(), "");
        assert!(!flow.is_loading());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn server_error_sets_message_and_clears_loading() {
        let transport = Arc::new(
            RecordingTransport::new().reply_json(500, json!({"message": "internal"})),
        );
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();

        let err = flow.submit("hello world", &backend).await.unwrap_err();

        assert!(matches!(err, FlowError::Network(_)));
        assert_eq!(flow.summary(), "");
        assert!(!flow.error_message().is_empty());
        assert!(!flow.error_message().contains("internal"));
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn error_detail_is_appended_when_enabled() {
        let transport = Arc::new(
            RecordingTransport::new().reply_json(500, json!({"message": "internal"})),
        );
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new().with_error_detail(true);

        let _ = flow.submit("hello world", &backend).await;

        assert!(flow.error_message().contains("internal"));
    }

    #[tokio::test]
    async fn new_submission_clears_previous_summary() {
        let transport = Arc::new(
            RecordingTransport::new()
                .reply_json(200, json!({"summary": "first"}))
                .fail("connection reset"),
        );
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();

        flow.submit("one", &backend).await.unwrap();
        assert_eq!(flow.summary(), "first");

        let _ = flow.submit("two", &backend).await;
        assert_eq!(flow.summary(), "");
        assert!(!flow.error_message().is_empty());
    }

    #[test]
    fn begin_while_loading_is_a_no_op() {
        let mut flow = TextSummaryFlow::new();
        flow.set_content("hello world");

        let first = flow.begin().unwrap();
        assert!(first.is_some());
        assert!(flow.is_loading());
        assert!(!flow.can_submit());

        let second = flow.begin().unwrap();
        assert!(second.is_none());
        assert!(flow.is_loading());
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut flow = TextSummaryFlow::new();
        assert!(flow.begin().is_err());
        assert!(!flow.error_message().is_empty());

        flow.set_content("now with text");
        flow.begin().unwrap();
        assert_eq!(flow.error_message(), "");
        assert_eq!(flow.summary(), "");
    }

    #[test]
    fn finish_without_begin_is_ignored() {
        let mut flow = TextSummaryFlow::new();
        flow.finish(Ok(TextResult {
            summary: "stray".into(),
        }));
        assert_eq!(flow.summary(), "");
        assert_eq!(flow.phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn over_limit_text_is_rejected_without_request() {
        let transport = Arc::new(RecordingTransport::new());
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();
        let long = "a".repeat(MAX_CHARS + 1);

        let err = flow.submit(&long, &backend).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::TooLong { len: 5001, max: 5000 })
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn editing_respects_the_cap() {
        let mut flow = TextSummaryFlow::new();
        flow.set_content(&"é".repeat(MAX_CHARS + 10));
        assert_eq!(flow.char_count(), MAX_CHARS);
        assert!(flow.near_limit());
        assert!(!flow.push_char('x'));

        flow.pop_char();
        assert!(flow.push_char('x'));
        assert_eq!(flow.char_count(), MAX_CHARS);

        flow.clear_content();
        assert_eq!(flow.char_count(), 0);
        assert!(!flow.near_limit());
        assert!(!flow.can_submit());
    }

    #[tokio::test]
    async fn rejected_input_keeps_previous_summary() {
        let transport = Arc::new(RecordingTransport::new().reply_json(200, json!({"summary": "hi"})));
        let backend = backend_with(&transport);
        let mut flow = TextSummaryFlow::new();
        flow.submit("hello world", &backend).await.unwrap();

        flow.set_content("   ");
        assert_eq!(flow.begin(), Err(ValidationError::EmptyInput));

        assert_eq!(flow.summary(), "hi");
        assert_eq!(flow.error_message(), "Please enter some text to summarize.");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn whitespace_still_enables_trigger() {
        let mut flow = TextSummaryFlow::new();
        flow.set_content("  ");
        assert!(flow.can_submit());
        assert_eq!(flow.begin(), Err(ValidationError::EmptyInput));
    }
}
