// Mock-interview prompt templates.

use crate::llm_client::prompts::{fill_template, STAR_METHOD};

/// Feedback instruction sent alongside the transcript. Free-form output, no schema.
/// Replace: {job_title}, {jd_text}, {question}, {answer}, {star_method}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer providing feedback to a candidate.
The candidate is interviewing for a "{job_title}" role based on the following job description:
---
{jd_text}
---

The conversation so far contains every earlier question, answer and your earlier feedback.
Here's the question asked: "{question}"
Here's the candidate's answer: "{answer}"

Provide constructive feedback on the candidate's answer.
Focus on clarity, completeness, relevance to the job description, and use of the STAR method if applicable.
{star_method}
Suggest specific areas for improvement. Keep the feedback concise and actionable."#;

pub fn feedback_prompt(job_title: &str, jd_text: &str, question: &str, answer: &str) -> String {
    fill_template(
        FEEDBACK_PROMPT_TEMPLATE,
        &[
            ("job_title", job_title),
            ("jd_text", jd_text),
            ("question", question),
            ("answer", answer),
            ("star_method", STAR_METHOD),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_prompt_covers_all_review_criteria() {
        let prompt = feedback_prompt(
            "Senior Data Engineer",
            "Must know SQL and Airflow",
            "How do you backfill a DAG?",
            "I clear the task instances.",
        );
        assert!(prompt.contains("\"Senior Data Engineer\" role"));
        assert!(prompt.contains("Must know SQL and Airflow"));
        assert!(prompt.contains("\"How do you backfill a DAG?\""));
        assert!(prompt.contains("\"I clear the task instances.\""));
        for criterion in ["clarity", "completeness", "relevance", "STAR"] {
            assert!(prompt.contains(criterion), "missing {criterion}");
        }
    }

    #[test]
    fn test_answer_text_is_not_expanded() {
        let prompt = feedback_prompt("SRE", "Run {question} drills", "Why Linux?", "Because {star_method}");
        assert!(prompt.contains("Run {question} drills"));
        assert!(prompt.contains("\"Because {star_method}\""));
        assert_eq!(prompt.matches("Why Linux?").count(), 1);
    }
}
