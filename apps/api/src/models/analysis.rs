use serde::{Deserialize, Serialize};

/// Category of a generated interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(alias = "technical")]
    Technical,
    #[serde(alias = "behavioral", alias = "Behavioural")]
    Behavioral,
    #[serde(alias = "situational")]
    Situational,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [Self::Technical, Self::Behavioral, Self::Situational];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Behavioral => "Behavioral",
            Self::Situational => "Situational",
        }
    }
}

/// One generated question with its STAR-structured sample answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQnA {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub answer: String,
}

/// A learning resource suggested for a missing skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateSuggestion {
    pub skill: String,
    pub resource_title: String,
    pub affiliate_link_placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqAnswer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqQuestion {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub accepted_answer: FaqAnswer,
}

/// schema.org `FAQPage` structured data, embedded as JSON-LD by the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqSchema {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub main_entity: Vec<FaqQuestion>,
    pub headline: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub meta_title: String,
    pub meta_description: String,
    pub faq_schema: FaqSchema,
}

/// Speaker of a mock-interview turn. Serialized with the remote API's role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Everything produced by one analysis run.
///
/// Only `mock_interview_history` changes after creation; every write replaces
/// the whole record in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub job_description_text: String,
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub key_tools: Vec<String>,
    pub seo_summary: String,
    #[serde(rename = "interviewQnA")]
    pub interview_qna: Vec<InterviewQnA>,
    pub skill_gap: Vec<String>,
    pub affiliate_suggestions: Vec<AffiliateSuggestion>,
    pub seo: SeoMetadata,
    pub mock_interview_history: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_accepts_lowercase_and_british_spelling() {
        let t: QuestionType = serde_json::from_str(r#""technical""#).unwrap();
        assert_eq!(t, QuestionType::Technical);
        let t: QuestionType = serde_json::from_str(r#""Behavioural""#).unwrap();
        assert_eq!(t, QuestionType::Behavioral);
    }

    #[test]
    fn test_question_type_rejects_unknown_category() {
        let result: Result<QuestionType, _> = serde_json::from_str(r#""Trivia""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_qna_uses_type_key() {
        let json = r#"{"question": "Why Rust?", "type": "Behavioral", "answer": "Situation: ..."}"#;
        let qna: InterviewQnA = serde_json::from_str(json).unwrap();
        assert_eq!(qna.question_type, QuestionType::Behavioral);

        let value = serde_json::to_value(&qna).unwrap();
        assert_eq!(value["type"], "Behavioral");
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let msg = ChatMessage::model("Good structure.");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "model");
        assert_eq!(value["text"], "Good structure.");
    }

    #[test]
    fn test_faq_schema_uses_json_ld_keys() {
        let schema = FaqSchema {
            context: "https://schema.org".to_string(),
            kind: "FAQPage".to_string(),
            main_entity: vec![FaqQuestion {
                kind: "Question".to_string(),
                name: "What is Airflow?".to_string(),
                accepted_answer: FaqAnswer {
                    kind: "Answer".to_string(),
                    text: "A workflow scheduler.".to_string(),
                },
            }],
            headline: "h".to_string(),
            description: "d".to_string(),
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "FAQPage");
        assert_eq!(value["mainEntity"][0]["acceptedAnswer"]["@type"], "Answer");
    }
}
