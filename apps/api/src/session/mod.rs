//! Session store: whole-record key/value persistence for analysis sessions.
//!
//! Records are stored as JSON under `session-{handle}`. There is no partial
//! update: callers read the full record, change a copy, and `put` it back.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::analysis::AnalysisRecord;

pub mod memory;

pub use memory::InMemorySessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session data not found. Please analyze a job description first.")]
    NotFound(SessionHandle),

    #[error("Invalid session ID '{0}'. Please analyze a job description first.")]
    InvalidHandle(String),

    #[error("Failed to load session data. It might be corrupted.")]
    Corrupted(#[source] serde_json::Error),

    #[error("Failed to serialize session data: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Opaque per-analysis identifier (v4 UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| SessionError::InvalidHandle(raw.to_string()))
    }

    pub fn storage_key(&self) -> String {
        format!("session-{}", self.0)
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replaces whatever is stored under `handle`.
    async fn put(&self, handle: &SessionHandle, record: &AnalysisRecord) -> Result<(), SessionError>;

    async fn get(&self, handle: &SessionHandle) -> Result<AnalysisRecord, SessionError>;
}

pub(crate) fn encode(record: &AnalysisRecord) -> Result<String, SessionError> {
    serde_json::to_string(record).map_err(SessionError::Serialize)
}

pub(crate) fn decode(raw: &str) -> Result<AnalysisRecord, SessionError> {
    serde_json::from_str(raw).map_err(SessionError::Corrupted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_format() {
        let handle = SessionHandle::parse("6f1c2a8e-3b7d-4e55-9a0c-1d2e3f4a5b6c").unwrap();
        assert_eq!(
            handle.storage_key(),
            "session-6f1c2a8e-3b7d-4e55-9a0c-1d2e3f4a5b6c"
        );
    }

    #[test]
    fn test_generated_handles_are_unique_and_parse_back() {
        let a = SessionHandle::generate();
        let b = SessionHandle::generate();
        assert_ne!(a, b);
        assert_eq!(SessionHandle::parse(&a.to_string()).unwrap(), a);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = SessionHandle::parse("undefined").unwrap_err();
        assert!(matches!(err, SessionError::InvalidHandle(_)));
    }

    #[test]
    fn test_decode_corrupted_json() {
        let err = decode("{\"jobTitle\": ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load session data. It might be corrupted."
        );
    }
}
