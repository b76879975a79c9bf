//! Interview question generation: ten typed questions with STAR sample answers.

use crate::analysis::jd_parser::ParsedJob;
use crate::analysis::prompts::question_prompt;
use crate::analysis::schema::QUESTION_COUNT;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::InterviewQnA;

pub async fn generate_questions(
    job: &ParsedJob,
    llm: &LlmClient,
) -> Result<Vec<InterviewQnA>, LlmError> {
    let prompt = question_prompt(&job.job_title, &job.required_skills, &job.key_tools);
    let questions: Vec<InterviewQnA> = llm.call_json(&prompt.text, prompt.schema).await?;
    validate_questions(questions)
}

/// The schema pins the count, but the model can still drift; anything other
/// than exactly `QUESTION_COUNT` complete items is a hard failure.
fn validate_questions(questions: Vec<InterviewQnA>) -> Result<Vec<InterviewQnA>, LlmError> {
    if questions.len() != QUESTION_COUNT {
        return Err(LlmError::SchemaViolation(format!(
            "expected {QUESTION_COUNT} interview questions, got {}",
            questions.len()
        )));
    }

    if let Some(pos) = questions
        .iter()
        .position(|q| q.question.trim().is_empty() || q.answer.trim().is_empty())
    {
        return Err(LlmError::SchemaViolation(format!(
            "interview question {} has an empty question or answer",
            pos + 1
        )));
    }

    Ok(questions)
}
