//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{HttpReply, Transport, TransportError, Upload};

/// One request seen by the recording transport.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Json { path: String, body: Value },
    Multipart { path: String, upload: Upload },
}

/// Replays canned replies in order and records every call made.
#[derive(Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Result<HttpReply, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with a JSON body.
    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.reply_raw(status, body.to_string().into_bytes())
    }

    pub fn reply_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(HttpReply {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_reply(&self) -> Result<HttpReply, TransportError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no reply queued".to_string()))
            .map_err(TransportError::Other)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall::Json {
            path: path.to_string(),
            body,
        });
        self.next_reply()
    }

    async fn post_multipart(
        &self,
        path: &str,
        upload: Upload,
    ) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall::Multipart {
            path: path.to_string(),
            upload,
        });
        self.next_reply()
    }
}
