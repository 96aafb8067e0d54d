//! `/api/ai/*` handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::{calculate_job_match, generate_cover_letter, JobMatchResult};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::job::JobWithCompany;
use crate::models::validation::require_non_empty;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAiRequest {
    pub job_id: Uuid,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    #[serde(rename = "match")]
    pub match_result: JobMatchResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

async fn load_job(state: &AppState, request: &JobAiRequest) -> Result<JobWithCompany, AppError> {
    require_non_empty("resumeText", &request.resume_text)?;
    state
        .storage
        .get_job(request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// POST /api/ai/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobAiRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let job = load_job(&state, &request).await?;
    let match_result = calculate_job_match(
        &state.llm,
        &request.resume_text,
        &job.job.description,
        &job.job.title,
    )
    .await?;
    Ok(Json(JobMatchResponse { match_result }))
}

/// POST /api/ai/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobAiRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let job = load_job(&state, &request).await?;
    let cover_letter = generate_cover_letter(
        &state.llm,
        &request.resume_text,
        &job.job.description,
        &job.job.title,
        &job.company.name,
    )
    .await?;
    Ok(Json(CoverLetterResponse { cover_letter }))
}
