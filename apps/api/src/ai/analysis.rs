use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::ai::coerce::{score, string_list};
use crate::ai::prompts::{analyze_resume_prompt, ANALYZE_RESUME_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::models::resume_analysis::AnalysisData;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisResult {
    pub ats_score: f64,
    pub keyword_optimization: f64,
    pub suggestions: Vec<String>,
    pub analysis_data: AnalysisData,
}

impl ResumeAnalysisResult {
    /// Coerces an arbitrary model reply into a well-formed result.
    pub fn from_value(value: &Value) -> Self {
        let data = value.get("analysisData");
        let field = |name: &str| data.and_then(|d| d.get(name));
        Self {
            ats_score: score(value.get("atsScore")),
            keyword_optimization: score(value.get("keywordOptimization")),
            suggestions: string_list(value.get("suggestions")),
            analysis_data: AnalysisData {
                strengths: string_list(field("strengths")),
                weaknesses: string_list(field("weaknesses")),
                missing_keywords: string_list(field("missingKeywords")),
                format_issues: string_list(field("formatIssues")),
                content_quality: score(field("contentQuality")),
                structure_score: score(field("structureScore")),
            },
        }
    }
}

pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    target_job_title: Option<&str>,
) -> Result<ResumeAnalysisResult, AppError> {
    let prompt = analyze_resume_prompt(resume_text, target_job_title);
    let reply: Value = llm
        .call_json(&prompt, &json_system(ANALYZE_RESUME_SYSTEM))
        .await?;
    let result = ResumeAnalysisResult::from_value(&reply);
    info!(
        ats_score = result.ats_score,
        suggestions = result.suggestions.len(),
        "Resume analyzed"
    );
    Ok(result)
}
