use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    SessionNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Message is shown to the end user as-is.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Session store error: {0}")]
    SessionStore(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) | SessionError::InvalidHandle(_) => {
                AppError::SessionNotFound(e.to_string())
            }
            SessionError::Corrupted(_) | SessionError::Serialize(_) => {
                AppError::SessionStore(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::SessionNotFound(msg) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::SessionStore(msg) => {
                tracing::error!("Session store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION_STORE_ERROR",
                    msg.clone(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionHandle;

    #[test]
    fn test_session_errors_map_to_user_facing_variants() {
        let not_found: AppError = SessionError::NotFound(SessionHandle::generate()).into();
        assert!(matches!(not_found, AppError::SessionNotFound(_)));
        assert_eq!(
            not_found.to_string(),
            "Session data not found. Please analyze a job description first."
        );

        let invalid: AppError = SessionError::InvalidHandle("abc".to_string()).into();
        assert!(matches!(invalid, AppError::SessionNotFound(_)));

        let corrupted: AppError =
            SessionError::Corrupted(serde_json::from_str::<u8>("x").unwrap_err()).into();
        assert!(matches!(corrupted, AppError::SessionStore(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::SessionNotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::Llm("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::SessionStore("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
