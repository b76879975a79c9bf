//! Axum route handlers for the mock-interview practice loop.
//!
//! The client owns the question cursor and sends it with every request.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::analysis::{ChatMessage, InterviewQnA};
use crate::practice::controller::{Navigation, PracticeSession, SubmitOutcome};
use crate::session::SessionHandle;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PracticeQuery {
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PracticeView {
    pub current_index: usize,
    pub total_questions: usize,
    pub question: Option<InterviewQnA>,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// `None` when the answer was blank and nothing was submitted.
    pub feedback: Option<String>,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub current_index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub current_index: usize,
    pub completion_message: Option<String>,
}

impl From<Navigation> for NavigateResponse {
    fn from(nav: Navigation) -> Self {
        let current_index = nav.index();
        let completion_message = match nav {
            Navigation::Completed { message, .. } => Some(message.to_string()),
            Navigation::Moved { .. } | Navigation::Unchanged { .. } => None,
        };
        Self {
            current_index,
            completion_message,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:session_id/practice?index=n
pub async fn handle_get_practice(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<PracticeQuery>,
) -> Result<Json<PracticeView>, AppError> {
    let handle = SessionHandle::parse(&session_id)?;
    let session = PracticeSession::load(state.sessions.as_ref(), handle, query.index).await?;

    Ok(Json(PracticeView {
        current_index: session.current_index(),
        total_questions: session.total_questions(),
        question: session.current_question().cloned(),
        history: session.transcript().to_vec(),
    }))
}

/// POST /api/v1/sessions/:session_id/practice/answer
///
/// At most one feedback request per session is outstanding; a second one gets 409.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let handle = SessionHandle::parse(&session_id)?;

    let permit = state.in_flight.try_acquire(handle).ok_or_else(|| {
        AppError::Conflict("A feedback request for this session is already in progress".to_string())
    })?;

    let mut session =
        PracticeSession::load(state.sessions.as_ref(), handle, request.question_index).await?;
    let outcome = session
        .submit_answer(&permit, &request.answer, &state.llm, state.sessions.as_ref())
        .await?;

    let feedback = match outcome {
        SubmitOutcome::Feedback(text) => Some(text),
        SubmitOutcome::Ignored => None,
    };

    Ok(Json(AnswerResponse {
        feedback,
        history: session.transcript().to_vec(),
    }))
}

/// POST /api/v1/sessions/:session_id/practice/next
pub async fn handle_next_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let handle = SessionHandle::parse(&session_id)?;
    let mut session =
        PracticeSession::load(state.sessions.as_ref(), handle, request.current_index).await?;
    Ok(Json(session.advance().into()))
}

/// POST /api/v1/sessions/:session_id/practice/previous
pub async fn handle_previous_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let handle = SessionHandle::parse(&session_id)?;
    let mut session =
        PracticeSession::load(state.sessions.as_ref(), handle, request.current_index).await?;
    Ok(Json(session.retreat().into()))
}
