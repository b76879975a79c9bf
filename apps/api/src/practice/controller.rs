//! Practice loop: steps through the generated questions and records
//! answer/feedback turns in the session's mock-interview transcript.
//!
//! Only `mock_interview_history` is ever changed here, and always by writing
//! the whole record back through the session store.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::{Content, GenerationOptions, LlmClient};
use crate::models::analysis::{AnalysisRecord, ChatMessage, InterviewQnA};
use crate::practice::prompts::feedback_prompt;
use crate::session::{SessionHandle, SessionStore};

pub const COMPLETION_MESSAGE: &str = "You've completed all the mock interview questions! Great job. \
    You can review your answers and feedback above, or go back to practice again.";

/// Feedback is sampled a little hotter than the analysis stages.
const FEEDBACK_TEMPERATURE: f32 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// In-flight guard
// ────────────────────────────────────────────────────────────────────────────

/// Sessions that currently have a feedback request outstanding.
#[derive(Default)]
pub struct InFlightRegistry {
    active: Mutex<HashSet<SessionHandle>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another feedback request for `handle` is pending.
    pub fn try_acquire(self: &Arc<Self>, handle: SessionHandle) -> Option<InFlightPermit> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(handle) {
            return None;
        }
        Some(InFlightPermit {
            registry: Arc::clone(self),
            handle,
        })
    }
}

/// Held for the duration of one feedback request; releases the session on drop.
pub struct InFlightPermit {
    registry: Arc<InFlightRegistry>,
    handle: SessionHandle,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        let mut active = self
            .registry
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        active.remove(&self.handle);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Practice session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Moved { index: usize },
    Unchanged { index: usize },
    Completed { index: usize, message: &'static str },
}

impl Navigation {
    pub fn index(&self) -> usize {
        match self {
            Navigation::Moved { index }
            | Navigation::Unchanged { index }
            | Navigation::Completed { index, .. } => *index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank answer or no current question; nothing was sent or stored.
    Ignored,
    Feedback(String),
}

pub struct PracticeSession {
    handle: SessionHandle,
    record: AnalysisRecord,
    current_index: usize,
}

impl PracticeSession {
    pub fn new(handle: SessionHandle, record: AnalysisRecord, current_index: usize) -> Self {
        Self {
            handle,
            record,
            current_index,
        }
    }

    /// Loads the record for `handle` and positions the cursor at `current_index`.
    pub async fn load(
        store: &dyn SessionStore,
        handle: SessionHandle,
        current_index: usize,
    ) -> Result<Self, AppError> {
        let record = store.get(&handle).await?;
        let total = record.interview_qna.len();
        if total > 0 && current_index >= total {
            return Err(AppError::Validation(format!(
                "Question index {current_index} is out of range (0..{total})"
            )));
        }
        Ok(Self::new(handle, record, current_index))
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.record.interview_qna.len()
    }

    pub fn current_question(&self) -> Option<&InterviewQnA> {
        self.record.interview_qna.get(self.current_index)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.record.mock_interview_history
    }

    pub fn advance(&mut self) -> Navigation {
        if self.current_index + 1 < self.total_questions() {
            self.current_index += 1;
            Navigation::Moved {
                index: self.current_index,
            }
        } else {
            Navigation::Completed {
                index: self.current_index,
                message: COMPLETION_MESSAGE,
            }
        }
    }

    pub fn retreat(&mut self) -> Navigation {
        if self.current_index > 0 {
            self.current_index -= 1;
            Navigation::Moved {
                index: self.current_index,
            }
        } else {
            Navigation::Unchanged { index: 0 }
        }
    }

    /// Sends the answer for the current question and stores the feedback turn.
    ///
    /// The caller must hold this session's `InFlightPermit` from before the
    /// record was loaded. On error the stored transcript is left untouched.
    pub async fn submit_answer(
        &mut self,
        _permit: &InFlightPermit,
        answer: &str,
        llm: &LlmClient,
        store: &dyn SessionStore,
    ) -> Result<SubmitOutcome, AppError> {
        if answer.trim().is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(question) = self.current_question().cloned() else {
            return Ok(SubmitOutcome::Ignored);
        };

        let mut working = self.record.mock_interview_history.clone();
        working.push(ChatMessage::user(format!(
            "Question: {}\nMy Answer: {}",
            question.question, answer
        )));

        let instruction = feedback_prompt(
            &self.record.job_title,
            &self.record.job_description_text,
            &question.question,
            answer,
        );
        let contents: Vec<Content> = working
            .iter()
            .map(|m| Content::new(m.role.as_str(), m.text.clone()))
            .collect();

        debug!(
            "Requesting feedback for session {} question {} ({} turns)",
            self.handle,
            self.current_index,
            contents.len()
        );
        let feedback = llm
            .generate(
                contents,
                Some(&instruction),
                &GenerationOptions::default().with_temperature(FEEDBACK_TEMPERATURE),
            )
            .await
            .map_err(|e| AppError::Llm(format!("Mock interview feedback failed: {e}")))?;

        working.push(ChatMessage::model(feedback.clone()));

        let mut updated = self.record.clone();
        updated.mock_interview_history = working;
        store.put(&self.handle, &updated).await?;
        self.record = updated;

        info!(
            "Recorded feedback for session {} ({} transcript turns)",
            self.handle,
            self.record.mock_interview_history.len()
        );
        Ok(SubmitOutcome::Feedback(feedback))
    }
}
