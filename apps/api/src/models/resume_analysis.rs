use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Detailed breakdown stored alongside each analysis snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub format_issues: Vec<String>,
    pub content_quality: f64,
    pub structure_score: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_url: String,
    pub ats_score: f64,
    pub keyword_optimization: f64,
    pub suggestions: Vec<String>,
    pub analysis_data: Json<AnalysisData>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResumeAnalysis {
    pub user_id: Uuid,
    pub resume_url: String,
    pub ats_score: f64,
    pub keyword_optimization: f64,
    pub suggestions: Vec<String>,
    pub analysis_data: AnalysisData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    #[serde(default)]
    pub resume_text: String,
    pub target_job_title: Option<String>,
}
