//! HTTP transport seam for the LLM client.
//!
//! The retry loop in `LlmClient` only needs "send this body, give me status + body".
//! Production uses `HttpTransport` (reqwest); tests replay scripted responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::GenerateContentRequest;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Status code and raw body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The request never produced an HTTP status (DNS, connect, timeout, body read).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// The request URL carries the API key, so it never reaches the message.
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.without_url().to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GenerateContentRequest) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport for the generateContent endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String, model: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{GEMINI_API_BASE}/{model}:generateContent"),
            api_key,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &GenerateContentRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{classify, CallOutcome, Content, GenerationOptions};

    fn request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user("hello")],
            system_instruction: None,
            generation_config: GenerationOptions::default().to_config(),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_does_not_leak_api_key() {
        let transport = HttpTransport {
            client: Client::new(),
            endpoint: "http://127.0.0.1:1/v1beta/models/m:generateContent".to_string(),
            api_key: "SECRET-KEY-123".to_string(),
        };

        let err = transport.send(&request()).await.unwrap_err();
        assert!(!err.0.contains("key="), "leaked query string: {}", err.0);
        assert!(!err.0.contains("SECRET-KEY-123"));

        match classify(Err(err)) {
            CallOutcome::NetworkFailure { status, message } => {
                assert_eq!(status, None);
                assert!(!message.contains("SECRET-KEY-123"));
            }
            other => panic!("expected network failure, got {other:?}"),
        }
    }
}
