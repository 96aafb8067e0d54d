use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::jobs::handlers::{ensure_can_manage, job_not_found};
use crate::models::application::{
    ApplicationWithJob, CreateApplicationRequest, JobApplication, StatusUpdateRequest,
};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationWithJob>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application: JobApplication,
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = state.storage.list_applications_by_user(user.id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    state
        .storage
        .get_job(request.job_id)
        .await?
        .ok_or_else(job_not_found)?;

    let application = state
        .storage
        .create_application(request.into_new_application(&user))
        .await?;
    info!(
        application_id = %application.id,
        job_id = %application.job_id,
        "Application submitted"
    );
    Ok((StatusCode::CREATED, Json(ApplicationResponse { application })))
}

/// PATCH /api/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<StatusUpdateRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let not_found = || AppError::NotFound("Application not found".to_string());

    let application = state
        .storage
        .get_application(id)
        .await?
        .ok_or_else(not_found)?;
    let job = state
        .storage
        .get_job(application.job_id)
        .await?
        .ok_or_else(job_not_found)?;
    ensure_can_manage(&user, &job.job)?;

    let next = application.status.transition(request.status)?;
    let application = state
        .storage
        .update_application_status(id, next)
        .await?
        .ok_or_else(not_found)?;
    info!(
        application_id = %application.id,
        status = next.as_str(),
        "Application status changed"
    );
    Ok(Json(ApplicationResponse { application }))
}
