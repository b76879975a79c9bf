use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::{decode, encode, SessionError, SessionHandle, SessionStore};
use crate::models::analysis::AnalysisRecord;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry {
    value: String,
    written_at: Instant,
}

/// Process-local store. A session ends `ttl` after its last write; expired
/// entries read as not found and are dropped on the next `put`.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.written_at) < self.ttl
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Writes a raw value under a storage key, bypassing serialization.
    #[cfg(test)]
    pub async fn put_raw(&self, key: String, value: String) {
        self.entries.write().await.insert(
            key,
            Entry {
                value,
                written_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, handle: &SessionHandle, record: &AnalysisRecord) -> Result<(), SessionError> {
        let value = encode(record)?;
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        if entries.len() < before {
            debug!("Expired {} session(s)", before - entries.len());
        }

        entries.insert(
            handle.storage_key(),
            Entry {
                value,
                written_at: now,
            },
        );
        Ok(())
    }

    async fn get(&self, handle: &SessionHandle) -> Result<AnalysisRecord, SessionError> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(&handle.storage_key())
            .filter(|entry| self.is_live(entry, Instant::now()))
            .ok_or(SessionError::NotFound(*handle))?;
        decode(&entry.value)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::analysis::*;

    /// A complete record with `qna_count` questions and an empty transcript.
    pub fn sample_record(qna_count: usize) -> AnalysisRecord {
        let interview_qna: Vec<InterviewQnA> = (0..qna_count)
            .map(|i| InterviewQnA {
                question: format!("Tell me about pipeline {i}."),
                question_type: QuestionType::ALL[i % 3],
                answer: format!("Situation {i}. Task. Action. Result."),
            })
            .collect();

        AnalysisRecord {
            job_description_text: "Senior Data Engineer, must know SQL and Airflow".to_string(),
            job_title: "Senior Data Engineer".to_string(),
            required_skills: vec!["SQL".to_string()],
            key_tools: vec!["Airflow".to_string()],
            seo_summary: "Data engineering role.".to_string(),
            skill_gap: vec!["dbt".to_string()],
            affiliate_suggestions: vec![AffiliateSuggestion {
                skill: "dbt".to_string(),
                resource_title: "dbt Fundamentals".to_string(),
                affiliate_link_placeholder: "[Affiliate_Link]".to_string(),
            }],
            seo: crate::analysis::seo::build_seo(
                "Senior Data Engineer",
                &["SQL".to_string()],
                &interview_qna,
                2026,
            ),
            interview_qna,
            mock_interview_history: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_record;
    use super::*;
    use crate::models::analysis::ChatMessage;

    #[tokio::test]
    async fn test_round_trip_is_deep_equal() {
        let store = InMemorySessionStore::new();
        let handle = SessionHandle::generate();
        let mut record = sample_record(10);
        record.mock_interview_history = vec![
            ChatMessage::user("Question: Q\nMy Answer: A"),
            ChatMessage::model("Good."),
        ];

        store.put(&handle, &record).await.unwrap();
        let loaded = store.get(&handle).await.unwrap();

        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_get_unknown_handle_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store.get(&SessionHandle::generate()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_overwrites_whole_record() {
        let store = InMemorySessionStore::new();
        let handle = SessionHandle::generate();
        store.put(&handle, &sample_record(10)).await.unwrap();

        let mut replacement = sample_record(3);
        replacement.job_title = "Staff Data Engineer".to_string();
        store.put(&handle, &replacement).await.unwrap();

        assert_eq!(store.get(&handle).await.unwrap(), replacement);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_corrupted_value_is_reported() {
        let store = InMemorySessionStore::new();
        let handle = SessionHandle::generate();
        store
            .put_raw(handle.storage_key(), "{not json".to_string())
            .await;

        let err = store.get(&handle).await.unwrap_err();
        assert!(matches!(err, SessionError::Corrupted(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_ttl() {
        let store = InMemorySessionStore::with_ttl(Duration::from_secs(60));
        let handle = SessionHandle::generate();
        store.put(&handle, &sample_record(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.get(&handle).await.is_ok());

        tokio::time::advance(Duration::from_secs(2)).await;
        let err = store.get(&handle).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_ttl_and_prunes_expired_sessions() {
        let store = InMemorySessionStore::with_ttl(Duration::from_secs(60));
        let active = SessionHandle::generate();
        store.put(&active, &sample_record(10)).await.unwrap();
        for _ in 0..100 {
            store
                .put(&SessionHandle::generate(), &sample_record(1))
                .await
                .unwrap();
        }
        assert_eq!(store.len().await, 101);

        tokio::time::advance(Duration::from_secs(45)).await;
        store.put(&active, &sample_record(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        store
            .put(&SessionHandle::generate(), &sample_record(1))
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.get(&active).await.is_ok());
    }
}
