//! Response schemas for schema-constrained generation.
//!
//! Uses the generateContent schema vocabulary (uppercase OpenAPI subset).

use serde_json::{json, Value};

use crate::models::analysis::QuestionType;

/// Number of interview questions requested per analysis.
pub const QUESTION_COUNT: usize = 10;

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

/// `{jobTitle, requiredSkills, keyTools, seoSummary}`, all required.
pub fn jd_parsing_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "jobTitle": string(),
            "requiredSkills": string_array(),
            "keyTools": string_array(),
            "seoSummary": string()
        },
        "required": ["jobTitle", "requiredSkills", "keyTools", "seoSummary"]
    })
}

/// Array of exactly `QUESTION_COUNT` `{question, type, answer}` objects.
pub fn question_schema() -> Value {
    let categories: Vec<&str> = QuestionType::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "type": "ARRAY",
        "minItems": QUESTION_COUNT,
        "maxItems": QUESTION_COUNT,
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": string(),
                "type": { "type": "STRING", "format": "enum", "enum": categories },
                "answer": string()
            },
            "required": ["question", "type", "answer"]
        }
    })
}

/// `{missingSkills, affiliateSuggestions}`; shared by both skill-gap prompt variants.
pub fn skill_gap_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "missingSkills": string_array(),
            "affiliateSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "skill": string(),
                        "resourceTitle": string(),
                        "affiliateLinkPlaceholder": string()
                    },
                    "required": ["skill", "resourceTitle", "affiliateLinkPlaceholder"]
                }
            }
        },
        "required": ["missingSkills", "affiliateSuggestions"]
    })
}
