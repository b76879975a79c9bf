// Analysis pipeline: JD parsing, question generation, skill-gap analysis, SEO metadata.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod handlers;
pub mod jd_parser;
pub mod orchestrator;
pub mod prompts;
pub mod questions;
pub mod resume_reader;
pub mod schema;
pub mod seo;
pub mod skill_gap;
