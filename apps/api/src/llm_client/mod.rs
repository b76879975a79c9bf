/// LLM Client: the single point of entry for all Gemini generateContent calls.
///
/// ARCHITECTURAL RULE: No other module may call the generative-language API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gemini-2.5-flash-preview-05-20 (fixed, not configurable)
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;
pub mod transport;

use transport::{HttpTransport, RawResponse, Transport, TransportError};

/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash-preview-05-20";
const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API error: {status} {message}")]
    Api { status: u16, message: String },

    #[error("Gemini API returned an unexpected response structure: {0}")]
    Malformed(String),

    #[error("Max retries reached for Gemini API call after {attempts} attempts (last failure: {last})")]
    MaxRetries {
        attempts: u32,
        last_status: Option<u16>,
        last: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response violates the expected schema: {0}")]
    SchemaViolation(String),

    #[error("HTTP client setup failed: {0}")]
    Setup(#[from] TransportError),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One role-tagged turn of a conversation (`role` is omitted for system instructions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    fn instruction(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation options
// ────────────────────────────────────────────────────────────────────────────

/// Sampling parameters plus an optional output schema for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub response_schema: Option<Value>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            response_schema: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Constrains the output to JSON matching `schema`.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    fn to_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            response_mime_type: self
                .response_schema
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: self.response_schema.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Attempt classification and retry policy
// ────────────────────────────────────────────────────────────────────────────

/// Result of a single network attempt, before any retry decision.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success(String),
    RateLimited { status: u16 },
    NetworkFailure { status: Option<u16>, message: String },
    Malformed(String),
    Rejected { status: u16, message: String },
}

impl CallOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CallOutcome::RateLimited { .. } | CallOutcome::NetworkFailure { .. }
        )
    }
}

/// Maps one transport result onto a `CallOutcome`.
/// 429 is rate limiting; transport errors and 5xx are transient; other non-2xx are final.
pub fn classify(result: Result<RawResponse, TransportError>) -> CallOutcome {
    let response = match result {
        Ok(r) => r,
        Err(e) => {
            return CallOutcome::NetworkFailure {
                status: None,
                message: e.0,
            }
        }
    };

    if response.status == 429 {
        return CallOutcome::RateLimited {
            status: response.status,
        };
    }

    if response.status >= 500 {
        return CallOutcome::NetworkFailure {
            status: Some(response.status),
            message: response.body,
        };
    }

    if !(200..300).contains(&response.status) {
        let message = serde_json::from_str::<GeminiError>(&response.body)
            .map(|e| e.error.message)
            .unwrap_or(response.body);
        return CallOutcome::Rejected {
            status: response.status,
            message,
        };
    }

    match extract_text(&response.body) {
        Ok(text) => CallOutcome::Success(text),
        Err(detail) => CallOutcome::Malformed(detail),
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &str) -> Result<String, String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| format!("body is not a candidates object: {e}"))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "no candidates".to_string())?;
    let content = candidate
        .content
        .ok_or_else(|| "first candidate has no content".to_string())?;
    content
        .parts
        .into_iter()
        .next()
        .and_then(|p| p.text)
        .ok_or_else(|| "first candidate has no text part".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt: `base * 2^failed_attempts + jitter` seconds,
    /// `jitter` drawn from [0, 1).
    pub fn backoff(&self, failed_attempts: u32, jitter: f64) -> Duration {
        self.base_delay * 2u32.saturating_pow(failed_attempts)
            + Duration::from_secs_f64(jitter.clamp(0.0, 1.0))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
/// Wraps the generateContent API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let transport = HttpTransport::new(api_key, MODEL)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    /// Sends a conversation and returns the first candidate's text.
    /// Retries on 429, 5xx and transport failures with exponential backoff plus jitter.
    pub async fn generate(
        &self,
        contents: Vec<Content>,
        system_instruction: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: system_instruction.map(Content::instruction),
            generation_config: options.to_config(),
        };

        let mut last_status = None;
        let mut last = String::from("no attempt made");

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.backoff(attempt - 1, rand::random::<f64>());
                warn!(
                    "Gemini call attempt {} failed ({}), retrying in {}ms...",
                    attempt,
                    last,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match classify(self.transport.send(&request).await) {
                CallOutcome::Success(text) => {
                    debug!(
                        "Gemini call succeeded on attempt {}: {} chars",
                        attempt + 1,
                        text.len()
                    );
                    return Ok(text);
                }
                CallOutcome::Malformed(detail) => return Err(LlmError::Malformed(detail)),
                CallOutcome::Rejected { status, message } => {
                    return Err(LlmError::Api { status, message })
                }
                CallOutcome::RateLimited { status } => {
                    last_status = Some(status);
                    last = format!("HTTP {status} rate limited");
                }
                CallOutcome::NetworkFailure { status, message } => {
                    last_status = status;
                    last = match status {
                        Some(s) => format!("HTTP {s}: {message}"),
                        None => message,
                    };
                }
            }
        }

        Err(LlmError::MaxRetries {
            attempts: self.policy.max_attempts,
            last_status,
            last,
        })
    }

    /// Single-prompt call with the given options.
    pub async fn call(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        self.generate(vec![Content::user(prompt)], None, options)
            .await
    }

    /// Schema-constrained call whose text is deserialized as JSON.
    /// A body that does not parse into `T` is a hard error.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, LlmError> {
        let options = GenerationOptions::default().with_schema(schema);
        let text = self.call(prompt, &options).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
