//! Client side of the summarization backend contract.
//!
//! Maps the two REST endpoints onto typed calls and turns non-success replies
//! into `NetworkError`s carrying whatever detail the backend supplied.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::summary::{DocumentRequest, DocumentResult, ErrorBody, TextRequest, TextResult};
use crate::transport::{HttpReply, HttpTransport, Transport, TransportError, Upload};

pub const TEXT_ENDPOINT: &str = "/summarize-text";
pub const DOCUMENT_ENDPOINT: &str = "/summarize-document";

/// Multipart field the backend reads the upload from
pub const FILE_FIELD: &str = "file";

/// A request was sent but did not produce a usable result.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("backend returned HTTP {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },
    #[error("unreadable backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NetworkError {
    /// Backend-supplied detail, when the failure came with one.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            NetworkError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Cheap-to-clone handle over an injected transport.
#[derive(Clone)]
pub struct Backend {
    transport: Arc<dyn Transport>,
}

impl Backend {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a backend talking HTTP to the configured deployment
    pub fn from_config(config: &BackendConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.base_url)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub async fn summarize_text(&self, request: &TextRequest) -> Result<TextResult, NetworkError> {
        debug!(chars = request.content.chars().count(), "posting text for summarization");
        let body = serde_json::to_value(request)?;
        let reply = self.transport.post_json(TEXT_ENDPOINT, body).await?;
        decode_reply(TEXT_ENDPOINT, reply)
    }

    pub async fn summarize_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<DocumentResult, NetworkError> {
        debug!(
            file = %request.file_name,
            bytes = request.bytes.len(),
            "uploading document for summarization"
        );
        let upload = Upload {
            field: FILE_FIELD.to_string(),
            file_name: request.file_name.clone(),
            mime_type: request.mime_type.clone(),
            bytes: request.bytes.clone(),
        };
        let reply = self.transport.post_multipart(DOCUMENT_ENDPOINT, upload).await?;
        decode_reply(DOCUMENT_ENDPOINT, reply)
    }
}

fn decode_reply<T: DeserializeOwned>(endpoint: &str, reply: HttpReply) -> Result<T, NetworkError> {
    if !reply.is_success() {
        // The error body is optional and may not even be JSON
        let detail = serde_json::from_slice::<ErrorBody>(&reply.body)
            .ok()
            .and_then(ErrorBody::detail);
        warn!(
            endpoint,
            status = reply.status,
            detail = detail.as_deref().unwrap_or("<none>"),
            "backend rejected request"
        );
        return Err(NetworkError::Status {
            status: reply.status,
            detail,
        });
    }

    serde_json::from_slice(&reply.body).map_err(|e| {
        warn!(endpoint, error = %e, "backend sent an unreadable response");
        NetworkError::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordedCall, RecordingTransport};
    use serde_json::json;

    fn backend(transport: &Arc<RecordingTransport>) -> Backend {
        Backend::new(transport.clone())
    }

    #[tokio::test]
    async fn text_posts_json_to_text_endpoint() {
        let transport = Arc::new(RecordingTransport::new().reply_json(200, json!({"summary": "hi"})));
        let result = backend(&transport)
            .summarize_text(&TextRequest {
                content: "hello world".into(),
            })
            .await
            .unwrap();

        assert_eq!(result.summary, "hi");
        match &transport.calls()[0] {
            RecordedCall::Json { path, body } => {
                assert_eq!(path, TEXT_ENDPOINT);
                assert_eq!(body, &json!({"text": "hello world"}));
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn document_uploads_file_field() {
        let transport = Arc::new(
            RecordingTransport::new()
                .reply_json(200, json!({"extracted_text": "T", "summary": "S"})),
        );
        let result = backend(&transport)
            .summarize_document(&DocumentRequest {
                file_name: "paper.pdf".into(),
                mime_type: "application/pdf".into(),
                bytes: b"%PDF-1.7".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(result.extracted_text, "T");
        assert_eq!(result.summary, "S");
        match &transport.calls()[0] {
            RecordedCall::Multipart { path, upload } => {
                assert_eq!(path, DOCUMENT_ENDPOINT);
                assert_eq!(upload.field, "file");
                assert_eq!(upload.file_name, "paper.pdf");
                assert_eq!(upload.mime_type, "application/pdf");
                assert_eq!(upload.bytes, b"%PDF-1.7");
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_carries_detail() {
        let transport = Arc::new(
            RecordingTransport::new().reply_json(503, json!({"message": "model is loading"})),
        );
        let err = backend(&transport)
            .summarize_text(&TextRequest {
                content: "x".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, NetworkError::Status { status: 503, .. }));
        assert_eq!(err.backend_detail(), Some("model is loading"));
        assert_eq!(err.to_string(), "backend returned HTTP 503: model is loading");
    }

    #[tokio::test]
    async fn non_json_error_body_has_no_detail() {
        let transport =
            Arc::new(RecordingTransport::new().reply_raw(502, "<html>Bad Gateway</html>"));
        let err = backend(&transport)
            .summarize_text(&TextRequest {
                content: "x".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.backend_detail(), None);
        assert_eq!(err.to_string(), "backend returned HTTP 502");
    }

    #[tokio::test]
    async fn garbage_success_body_is_decode_error() {
        let transport = Arc::new(RecordingTransport::new().reply_raw(200, "not json"));
        let err = backend(&transport)
            .summarize_text(&TextRequest {
                content: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let transport = Arc::new(RecordingTransport::new().fail("connection refused"));
        let err = backend(&transport)
            .summarize_text(&TextRequest {
                content: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }
}
