use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::jobs::handlers::job_not_found;
use crate::models::saved_job::{SaveJobRequest, SavedJob, SavedJobWithJob};
use crate::models::user::User;
use crate::models::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobListResponse {
    pub saved_jobs: Vec<SavedJobWithJob>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobResponse {
    pub saved_job: SavedJob,
}

/// GET /api/saved-jobs
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<SavedJobListResponse>, AppError> {
    let saved_jobs = state.storage.list_saved_jobs(user.id).await?;
    Ok(Json(SavedJobListResponse { saved_jobs }))
}

/// POST /api/saved-jobs
///
/// Saving the same job twice is a conflict; the first bookmark is kept.
pub async fn handle_save_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<SaveJobRequest>,
) -> Result<(StatusCode, Json<SavedJobResponse>), AppError> {
    state
        .storage
        .get_job(request.job_id)
        .await?
        .ok_or_else(job_not_found)?;
    let saved_job = state
        .storage
        .create_saved_job(user.id, request.job_id)
        .await?;
    Ok((StatusCode::CREATED, Json(SavedJobResponse { saved_job })))
}

/// DELETE /api/saved-jobs/:jobId
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.storage.delete_saved_job(user.id, job_id).await? {
        return Err(AppError::NotFound("Saved job not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: "Job removed from saved list",
    }))
}
