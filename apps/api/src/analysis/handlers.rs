//! Axum route handlers for the analysis and results API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::orchestrator::{AnalysisInput, AnalysisPipeline};
use crate::analysis::resume_reader::extract_resume_text;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;
use crate::session::SessionHandle;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
    #[serde(default)]
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub session_id: String,
    /// Set when an uploaded resume could not be read and the run continued without it.
    pub resume_warning: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Runs the full analysis pipeline on a pasted JD (and optional resume text).
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    run_analysis(
        &state,
        AnalysisInput {
            job_description: request.job_description,
            resume_text: request.resume_text,
        },
        None,
    )
    .await
}

/// POST /api/v1/analyses/upload
///
/// Multipart variant: `job_description` text field plus an optional `resume` file.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut job_description = String::new();
    let mut resume: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("job_description") => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
            }
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field.bytes().await.map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        AppError::PayloadTooLarge(format!(
                            "Resume file exceeds {} bytes",
                            state.config.max_resume_bytes
                        ))
                    } else {
                        AppError::Validation(format!("Invalid resume upload: {e}"))
                    }
                })?;
                if data.len() > state.config.max_resume_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Resume file exceeds {} bytes",
                        state.config.max_resume_bytes
                    )));
                }
                if !data.is_empty() {
                    resume = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }

    let mut resume_warning = None;
    let resume_text = match resume {
        Some((file_name, data)) => match extract_resume_text(&file_name, data).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to read resume '{file_name}': {e}; continuing without it");
                resume_warning = Some(format!(
                    "Failed to read resume file ({e}). The analysis continued without it."
                ));
                None
            }
        },
        None => None,
    };

    run_analysis(
        &state,
        AnalysisInput {
            job_description,
            resume_text,
        },
        resume_warning,
    )
    .await
}

async fn run_analysis(
    state: &AppState,
    input: AnalysisInput,
    resume_warning: Option<String>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let pipeline = AnalysisPipeline::new(&state.llm, state.sessions.as_ref());
    let handle = pipeline.run(input).await?;

    info!("Analysis complete, session {handle}");
    Ok(Json(AnalyzeResponse {
        session_id: handle.to_string(),
        resume_warning,
    }))
}

/// GET /api/v1/sessions/:session_id
///
/// Results view: the full stored analysis record.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let handle = SessionHandle::parse(&session_id)?;
    let record = state.sessions.get(&handle).await?;
    Ok(Json(record))
}
