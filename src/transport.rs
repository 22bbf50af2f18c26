//! HTTP capability the flows are built on.
//!
//! The `Transport` trait is the seam between the summarization logic and the
//! network; `HttpTransport` implements it with reqwest.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("crux/", env!("CARGO_PKG_VERSION"), " (https://github.com/cladam/crux)");

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single file sent as one part of a multipart form.
#[derive(Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Injected HTTP capability. Paths are relative to the transport's base URL.
///
/// Any status code is a successful exchange at this level; only failures to
/// get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpReply, TransportError>;

    async fn post_multipart(&self, path: &str, upload: Upload)
        -> Result<HttpReply, TransportError>;
}

/// reqwest-backed transport bound to one deployment.
///
/// No request timeout is configured: a request runs until the backend answers
/// or the connection fails.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_reply(response: reqwest::Response) -> Result<HttpReply, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let response = self.client.post(self.url(path)).json(&body).send().await?;
        Self::read_reply(response).await
    }

    async fn post_multipart(
        &self,
        path: &str,
        upload: Upload,
    ) -> Result<HttpReply, TransportError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part(upload.field, part);

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::read_reply(response).await
    }
}
