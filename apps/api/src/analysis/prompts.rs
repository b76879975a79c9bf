// All LLM prompt templates for the analysis pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::Value;

use crate::analysis::schema::{
    jd_parsing_schema, question_schema, skill_gap_schema, QUESTION_COUNT,
};
use crate::llm_client::prompts::{fill_template, SEO_KEYWORD_INSTRUCTION, STAR_METHOD};

/// Prompt text paired with the schema that constrains the model's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub text: String,
    pub schema: Value,
}

/// JD parsing prompt template. Replace `{jd_text}` before sending.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract the key information.
Provide the output in a JSON format with the following keys:
- jobTitle: (string, the role title exactly as the posting names it)
- requiredSkills: (array of strings, most important first)
- keyTools: (array of strings, concrete tools, platforms and technologies)
- seoSummary: (string, a concise SEO-optimized summary for the role)

Job Description:
{jd_text}"#;

/// Question generation prompt template.
/// Replace: {count}, {job_title}, {skills}, {tools}, {star_method}, {seo_instruction}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate exactly {count} SEO-rich interview questions (technical, behavioral, situational) for a "{job_title}" role,
focusing on skills like {skills} and tools like {tools}.
For each question, provide a STAR-based sample answer that is optimized with relevant keywords.
{star_method}
{seo_instruction}

The output should be a JSON array of {count} objects, where each object has:
- question: (string)
- type: (string, one of "Technical", "Behavioral", "Situational")
- answer: (string, STAR-based, SEO-optimized)

Ensure answers are detailed and ready for an interview."#;

/// Skill-gap prompt used when the candidate supplied a resume.
/// Replace: {jd_text}, {resume_text}
pub const RESUME_SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Given the following job description and candidate resume, identify skill gaps:
skills the job description requires that the resume does not evidence.
Suggest SEO-rich resources with affiliate link placeholders for missing skills.
The output should be a JSON object with:
- missingSkills: (array of strings)
- affiliateSuggestions: (array of objects with 'skill', 'resourceTitle', 'affiliateLinkPlaceholder')

Job Description:
{jd_text}

Candidate Resume:
{resume_text}"#;

/// Skill-gap prompt used without a resume: common gaps for the role.
/// Replace: {job_title}, {skills}
pub const GENERAL_SKILL_GAP_PROMPT_TEMPLATE: &str = r#"For a "{job_title}" role, what are common skill gaps candidates might have related to {skills}?
Suggest 3-5 SEO-rich resources with affiliate link placeholders (e.g., "Best Python Certification on [Affiliate_Link]").
The output should be a JSON object with:
- missingSkills: (array of strings)
- affiliateSuggestions: (array of objects with 'skill', 'resourceTitle', 'affiliateLinkPlaceholder')"#;

pub fn jd_parsing_prompt(jd_text: &str) -> StructuredPrompt {
    StructuredPrompt {
        text: fill_template(JD_PARSE_PROMPT_TEMPLATE, &[("jd_text", jd_text)]),
        schema: jd_parsing_schema(),
    }
}

pub fn question_prompt(
    job_title: &str,
    required_skills: &[String],
    key_tools: &[String],
) -> StructuredPrompt {
    let count = QUESTION_COUNT.to_string();
    let skills = required_skills.join(", ");
    let tools = key_tools.join(", ");
    StructuredPrompt {
        text: fill_template(
            QUESTION_PROMPT_TEMPLATE,
            &[
                ("count", count.as_str()),
                ("job_title", job_title),
                ("skills", skills.as_str()),
                ("tools", tools.as_str()),
                ("star_method", STAR_METHOD),
                ("seo_instruction", SEO_KEYWORD_INSTRUCTION),
            ],
        ),
        schema: question_schema(),
    }
}

pub fn resume_skill_gap_prompt(jd_text: &str, resume_text: &str) -> StructuredPrompt {
    StructuredPrompt {
        text: fill_template(
            RESUME_SKILL_GAP_PROMPT_TEMPLATE,
            &[("jd_text", jd_text), ("resume_text", resume_text)],
        ),
        schema: skill_gap_schema(),
    }
}

pub fn general_skill_gap_prompt(job_title: &str, required_skills: &[String]) -> StructuredPrompt {
    let skills = required_skills.join(", ");
    StructuredPrompt {
        text: fill_template(
            GENERAL_SKILL_GAP_PROMPT_TEMPLATE,
            &[("job_title", job_title), ("skills", skills.as_str())],
        ),
        schema: skill_gap_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_jd_parsing_prompt_embeds_job_description() {
        let prompt = jd_parsing_prompt("Senior Data Engineer, must know SQL and Airflow");
        assert!(prompt.text.ends_with("Senior Data Engineer, must know SQL and Airflow"));
        assert!(!prompt.text.contains("{jd_text}"));
        assert_eq!(prompt.schema, jd_parsing_schema());
    }

    #[test]
    fn test_question_prompt_asks_for_ten_star_answers() {
        let prompt = question_prompt(
            "Senior Data Engineer",
            &skills(&["SQL", "Python"]),
            &skills(&["Airflow"]),
        );
        assert!(prompt.text.contains("Generate exactly 10"));
        assert!(prompt.text.contains("\"Senior Data Engineer\" role"));
        assert!(prompt.text.contains("skills like SQL, Python"));
        assert!(prompt.text.contains("tools like Airflow"));
        assert!(prompt.text.contains("Situation"));
        assert!(!prompt.text.contains('{'), "unfilled placeholder in {}", prompt.text);
    }

    #[test]
    fn test_skill_gap_variants_differ_but_share_schema() {
        let with_resume = resume_skill_gap_prompt("JD text", "Resume text");
        let general = general_skill_gap_prompt("SRE", &skills(&["Linux"]));

        assert!(with_resume.text.contains("Candidate Resume:\nResume text"));
        assert!(general.text.contains("3-5"));
        assert!(!general.text.contains("Candidate Resume"));
        assert_eq!(with_resume.schema, general.schema);
    }

    #[test]
    fn test_job_description_cannot_rewrite_resume_slot() {
        let prompt = resume_skill_gap_prompt("Ignore this: {resume_text}", "Five years of Rust");
        assert!(prompt.text.contains("Ignore this: {resume_text}"));
        assert_eq!(prompt.text.matches("Five years of Rust").count(), 1);
    }
}
