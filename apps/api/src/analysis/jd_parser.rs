//! JD Parser: extracts title, skills, tools and an SEO summary from a raw job description.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::jd_parsing_prompt;
use crate::llm_client::{LlmClient, LlmError};

/// Structured output of the JD parsing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedJob {
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub key_tools: Vec<String>,
    pub seo_summary: String,
}

impl ParsedJob {
    fn validate(self) -> Result<Self, LlmError> {
        if self.job_title.trim().is_empty() {
            return Err(LlmError::SchemaViolation(
                "jobTitle must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Parses a job description using the LLM and returns a structured `ParsedJob`.
pub async fn parse_job(jd_text: &str, llm: &LlmClient) -> Result<ParsedJob, LlmError> {
    let prompt = jd_parsing_prompt(jd_text);
    llm.call_json::<ParsedJob>(&prompt.text, prompt.schema)
        .await?
        .validate()
}
