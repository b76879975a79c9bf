//! Scripted transport for tests: replays queued HTTP exchanges and records requests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::transport::{RawResponse, Transport, TransportError};
use super::GenerateContentRequest;

/// Wraps `text` in a minimal generateContent success body.
pub fn candidates_body(text: &str) -> RawResponse {
    RawResponse {
        status: 200,
        body: serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string(),
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: Result<RawResponse, TransportError>) {
        self.script.lock().unwrap().push_back(entry);
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(candidates_body(text)));
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.push_text(&value.to_string());
    }

    pub fn push_status(&self, status: u16) {
        self.push_raw(status, "");
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.push(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, message: &str) {
        self.push(Err(TransportError(message.to_string())));
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &GenerateContentRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
    }
}
