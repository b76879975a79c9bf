//! SEO metadata: deterministic templates over the parsed job and generated Q&A.

use chrono::{Datelike, Utc};

use crate::models::analysis::{FaqAnswer, FaqQuestion, FaqSchema, InterviewQnA, SeoMetadata};

/// How many required skills appear in the meta title and description.
const META_SKILL_COUNT: usize = 3;
/// How many Q&A pairs go into the FAQ structured data.
const FAQ_ENTRY_LIMIT: usize = 5;

fn primary_skills(skills: &[String]) -> String {
    skills
        .iter()
        .take(META_SKILL_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn meta_title(role: &str, skills: &[String], year: i32) -> String {
    format!(
        "Top Interview Questions for {role} ({year} Guide) | Master {}",
        primary_skills(skills)
    )
}

pub fn meta_description(role: &str, skills: &[String]) -> String {
    format!(
        "Prepare for your {role} interview with key questions on {} and more. \
        Get STAR-based answers and skill gap analysis for an ATS-friendly preparation.",
        primary_skills(skills)
    )
}

/// FAQPage JSON-LD from the first five Q&A pairs. Question type is dropped.
pub fn faq_schema(job_title: &str, qna: &[InterviewQnA]) -> FaqSchema {
    let main_entity = qna
        .iter()
        .take(FAQ_ENTRY_LIMIT)
        .map(|item| FaqQuestion {
            kind: "Question".to_string(),
            name: item.question.clone(),
            accepted_answer: FaqAnswer {
                kind: "Answer".to_string(),
                text: item.answer.clone(),
            },
        })
        .collect();

    FaqSchema {
        context: "https://schema.org".to_string(),
        kind: "FAQPage".to_string(),
        main_entity,
        headline: format!("Interview Questions for {job_title} - FAQ"),
        description: format!(
            "Frequently asked questions to prepare for a {job_title} interview."
        ),
    }
}

pub fn build_seo(
    job_title: &str,
    required_skills: &[String],
    qna: &[InterviewQnA],
    year: i32,
) -> SeoMetadata {
    SeoMetadata {
        meta_title: meta_title(job_title, required_skills, year),
        meta_description: meta_description(job_title, required_skills),
        faq_schema: faq_schema(job_title, qna),
    }
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
