pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::practice::handlers as practice;
use crate::state::AppState;

/// Room for the JD text and multipart framing on top of the resume itself.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_resume_bytes + BODY_LIMIT_HEADROOM;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/api/v1/analyses", post(analysis::handle_analyze))
        .route(
            "/api/v1/analyses/upload",
            post(analysis::handle_analyze_upload),
        )
        .route(
            "/api/v1/sessions/:session_id",
            get(analysis::handle_get_session),
        )
        // Practice
        .route(
            "/api/v1/sessions/:session_id/practice",
            get(practice::handle_get_practice),
        )
        .route(
            "/api/v1/sessions/:session_id/practice/answer",
            post(practice::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:session_id/practice/next",
            post(practice::handle_next_question),
        )
        .route(
            "/api/v1/sessions/:session_id/practice/previous",
            post(practice::handle_previous_question),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
