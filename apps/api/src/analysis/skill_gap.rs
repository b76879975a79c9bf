//! Skill-gap analysis: resume-vs-JD comparison, or common gaps for the role
//! when no resume was supplied.

use serde::{Deserialize, Serialize};

use crate::analysis::jd_parser::ParsedJob;
use crate::analysis::prompts::{general_skill_gap_prompt, resume_skill_gap_prompt, StructuredPrompt};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::AffiliateSuggestion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapReport {
    pub missing_skills: Vec<String>,
    pub affiliate_suggestions: Vec<AffiliateSuggestion>,
}

/// Which skill-gap prompt a run uses. Chosen once, before the stage executes.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillGapVariant {
    WithResume { resume_text: String },
    General,
}

impl SkillGapVariant {
    /// Whitespace-only or absent resume text selects the general variant.
    pub fn select(resume_text: Option<&str>) -> Self {
        match resume_text.map(str::trim) {
            Some(text) if !text.is_empty() => SkillGapVariant::WithResume {
                resume_text: text.to_string(),
            },
            _ => SkillGapVariant::General,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillGapVariant::WithResume { .. } => "with-resume",
            SkillGapVariant::General => "general",
        }
    }

    pub fn prompt(&self, jd_text: &str, job: &ParsedJob) -> StructuredPrompt {
        match self {
            SkillGapVariant::WithResume { resume_text } => {
                resume_skill_gap_prompt(jd_text, resume_text)
            }
            SkillGapVariant::General => {
                general_skill_gap_prompt(&job.job_title, &job.required_skills)
            }
        }
    }
}

pub async fn analyze_skill_gap(
    variant: &SkillGapVariant,
    jd_text: &str,
    job: &ParsedJob,
    llm: &LlmClient,
) -> Result<SkillGapReport, LlmError> {
    let prompt = variant.prompt(jd_text, job);
    llm.call_json(&prompt.text, prompt.schema).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::llm_client::testing::ScriptedTransport;

    fn job() -> ParsedJob {
        ParsedJob {
            job_title: "Platform Engineer".to_string(),
            required_skills: vec!["Kubernetes".to_string(), "Go".to_string()],
            key_tools: vec![],
            seo_summary: String::new(),
        }
    }

    #[test]
    fn test_select_uses_resume_only_when_non_blank() {
        assert_eq!(SkillGapVariant::select(None), SkillGapVariant::General);
        assert_eq!(SkillGapVariant::select(Some(" \n\t")), SkillGapVariant::General);
        assert_eq!(
            SkillGapVariant::select(Some("  Go developer, 5 years  ")),
            SkillGapVariant::WithResume {
                resume_text: "Go developer, 5 years".to_string()
            }
        );
    }

    #[test]
    fn test_variant_prompts_are_distinct() {
        let general = SkillGapVariant::General.prompt("JD", &job());
        let with_resume = SkillGapVariant::select(Some("My resume")).prompt("JD", &job());

        assert!(general.text.contains("\"Platform Engineer\" role"));
        assert!(general.text.contains("Kubernetes, Go"));
        assert!(with_resume.text.contains("My resume"));
        assert_ne!(general.text, with_resume.text);
    }

    #[tokio::test]
    async fn test_analyze_skill_gap_parses_report() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({
            "missingSkills": ["Kubernetes"],
            "affiliateSuggestions": [{
                "skill": "Kubernetes",
                "resourceTitle": "CKA Certification Course",
                "affiliateLinkPlaceholder": "[Affiliate_Link]"
            }]
        }));
        let llm = LlmClient::with_transport(transport);

        let report = analyze_skill_gap(&SkillGapVariant::General, "JD", &job(), &llm)
            .await
            .unwrap();

        assert_eq!(report.missing_skills, vec!["Kubernetes"]);
        assert_eq!(
            report.affiliate_suggestions[0].resource_title,
            "CKA Certification Course"
        );
    }

    #[tokio::test]
    async fn test_analyze_skill_gap_missing_required_field_fails() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({"missingSkills": ["Go"]}));
        let llm = LlmClient::with_transport(transport);

        let err = analyze_skill_gap(&SkillGapVariant::General, "JD", &job(), &llm)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
