//! Resume file-to-text reader used before an analysis run starts.
//!
//! A read failure never blocks the analysis: callers log it, surface it as a
//! warning and fall back to the general skill-gap variant.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResumeReadError {
    #[error("unsupported file type '.{0}'; upload a PDF or plain-text resume")]
    Unsupported(String),

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("file is not valid UTF-8 text")]
    NotUtf8,

    #[error("resume reader task failed: {0}")]
    Task(String),
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Extracts resume text. PDFs go through `pdf-extract` on a blocking thread;
/// everything else except Word documents is read as UTF-8.
pub async fn extract_resume_text(file_name: &str, data: Bytes) -> Result<String, ResumeReadError> {
    match extension(file_name).as_deref() {
        Some("pdf") => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ResumeReadError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ResumeReadError::Task(e.to_string()))?,
        Some(ext @ ("doc" | "docx")) => Err(ResumeReadError::Unsupported(ext.to_string())),
        _ => String::from_utf8(data.to_vec()).map_err(|_| ResumeReadError::NotUtf8),
    }
}
