//! Analysis pipeline: runs the four dependent stages and persists one record.
//!
//! Flow: ParsingJd → GeneratingQna → AnalyzingSkillGap → BuildingRecord → Done.
//! Any stage error ends the run as `Err(AnalysisError)` (the Failed state);
//! nothing is written to the session store unless every stage succeeded.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::analysis::jd_parser::{parse_job, ParsedJob};
use crate::analysis::questions::generate_questions;
use crate::analysis::seo::{build_seo, current_year};
use crate::analysis::skill_gap::{analyze_skill_gap, SkillGapReport, SkillGapVariant};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::{AnalysisRecord, InterviewQnA};
use crate::session::{SessionError, SessionHandle, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParsingJd,
    GeneratingQna,
    AnalyzingSkillGap,
    BuildingRecord,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ParsingJd => "Job description parsing",
            Stage::GeneratingQna => "Interview question generation",
            Stage::AnalyzingSkillGap => "Skill-gap analysis",
            Stage::BuildingRecord => "Record assembly",
            Stage::Done => "Saving the analysis",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Job description cannot be empty")]
    EmptyJobDescription,

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("Saving the analysis failed: {0}")]
    Store(#[from] SessionError),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::EmptyJobDescription => AppError::Validation(e.to_string()),
            AnalysisError::Stage { .. } => AppError::Llm(e.to_string()),
            AnalysisError::Store(inner) => inner.into(),
        }
    }
}

/// Inputs collected before the pipeline starts.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub job_description: String,
    pub resume_text: Option<String>,
}

/// Each state carries everything the next stage depends on.
enum PipelineState {
    ParsingJd,
    GeneratingQna {
        job: ParsedJob,
    },
    AnalyzingSkillGap {
        job: ParsedJob,
        qna: Vec<InterviewQnA>,
    },
    BuildingRecord {
        job: ParsedJob,
        qna: Vec<InterviewQnA>,
        gap: SkillGapReport,
    },
    Done(AnalysisRecord),
}

impl PipelineState {
    fn stage(&self) -> Stage {
        match self {
            PipelineState::ParsingJd => Stage::ParsingJd,
            PipelineState::GeneratingQna { .. } => Stage::GeneratingQna,
            PipelineState::AnalyzingSkillGap { .. } => Stage::AnalyzingSkillGap,
            PipelineState::BuildingRecord { .. } => Stage::BuildingRecord,
            PipelineState::Done(_) => Stage::Done,
        }
    }
}

pub struct AnalysisPipeline<'a> {
    llm: &'a LlmClient,
    store: &'a dyn SessionStore,
    year: i32,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn new(llm: &'a LlmClient, store: &'a dyn SessionStore) -> Self {
        Self {
            llm,
            store,
            year: current_year(),
        }
    }

    /// Runs every stage and returns the handle the record was stored under.
    pub async fn run(&self, input: AnalysisInput) -> Result<SessionHandle, AnalysisError> {
        if input.job_description.trim().is_empty() {
            return Err(AnalysisError::EmptyJobDescription);
        }

        let jd_text = input.job_description.as_str();
        let variant = SkillGapVariant::select(input.resume_text.as_deref());
        info!(
            "Starting analysis: {} chars of JD, {} skill-gap variant",
            jd_text.len(),
            variant.label()
        );

        let mut state = PipelineState::ParsingJd;
        loop {
            let stage = state.stage();
            let fail = |source: LlmError| AnalysisError::Stage { stage, source };

            state = match state {
                PipelineState::ParsingJd => {
                    let job = parse_job(jd_text, self.llm).await.map_err(fail)?;
                    info!(
                        "JD parsed: title={:?}, {} skills, {} tools",
                        job.job_title,
                        job.required_skills.len(),
                        job.key_tools.len()
                    );
                    PipelineState::GeneratingQna { job }
                }
                PipelineState::GeneratingQna { job } => {
                    let qna = generate_questions(&job, self.llm).await.map_err(fail)?;
                    info!("Generated {} interview questions", qna.len());
                    PipelineState::AnalyzingSkillGap { job, qna }
                }
                PipelineState::AnalyzingSkillGap { job, qna } => {
                    let gap = analyze_skill_gap(&variant, jd_text, &job, self.llm)
                        .await
                        .map_err(fail)?;
                    info!(
                        "Skill gap ({}): {} missing skills, {} suggestions",
                        variant.label(),
                        gap.missing_skills.len(),
                        gap.affiliate_suggestions.len()
                    );
                    PipelineState::BuildingRecord { job, qna, gap }
                }
                PipelineState::BuildingRecord { job, qna, gap } => {
                    PipelineState::Done(self.build_record(jd_text, job, qna, gap))
                }
                PipelineState::Done(record) => {
                    let handle = SessionHandle::generate();
                    self.store.put(&handle, &record).await?;
                    info!("Analysis stored as session {handle}");
                    return Ok(handle);
                }
            };
        }
    }

    fn build_record(
        &self,
        jd_text: &str,
        job: ParsedJob,
        qna: Vec<InterviewQnA>,
        gap: SkillGapReport,
    ) -> AnalysisRecord {
        let seo = build_seo(&job.job_title, &job.required_skills, &qna, self.year);

        AnalysisRecord {
            job_description_text: jd_text.to_string(),
            job_title: job.job_title,
            required_skills: job.required_skills,
            key_tools: job.key_tools,
            seo_summary: job.seo_summary,
            interview_qna: qna,
            skill_gap: gap.missing_skills,
            affiliate_suggestions: gap.affiliate_suggestions,
            seo,
            mock_interview_history: Vec::new(),
        }
    }
}
