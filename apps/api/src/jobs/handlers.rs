use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::application::ApplicationWithApplicant;
use crate::models::job::{CreateJobRequest, Job, JobUpdate, JobWithCompany};
use crate::models::user::User;
use crate::models::validation::non_blank;
use crate::state::AppState;
use crate::storage::filter::JobQuery;
use crate::storage::{JobFilter, JobStats, FEATURED_JOBS_LIMIT, SEARCH_LIMIT};

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobWithCompany>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobWithCompany,
}

#[derive(Debug, Serialize)]
pub struct JobApplicationsResponse {
    pub applications: Vec<ApplicationWithApplicant>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub(crate) fn job_not_found() -> AppError {
    AppError::NotFound("Job not found".to_string())
}

/// Only the poster of a job, or an admin, may manage it.
pub(crate) fn ensure_can_manage(user: &User, job: &Job) -> Result<(), AppError> {
    if user.is_admin() || job.posted_by_id == Some(user.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the job poster can manage this job".to_string(),
        ))
    }
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let filter = JobFilter::try_from(query)?;
    let jobs = state.storage.list_jobs(&filter).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/jobs/featured
pub async fn handle_featured_jobs(
    State(state): State<AppState>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = state.storage.featured_jobs(FEATURED_JOBS_LIMIT).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.storage.get_job(id).await?.ok_or_else(job_not_found)?;
    Ok(Json(JobResponse { job }))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    request.validate()?;
    let company = state
        .storage
        .get_company(request.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let job = state
        .storage
        .create_job(request.into_new_job(user.id))
        .await?;
    info!(job_id = %job.id, company_id = %company.id, "Created job");

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            job: JobWithCompany { job, company },
        }),
    ))
}

/// PATCH /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<JobUpdate>,
) -> Result<Json<JobResponse>, AppError> {
    let JobWithCompany { mut job, company } =
        state.storage.get_job(id).await?.ok_or_else(job_not_found)?;
    ensure_can_manage(&user, &job)?;
    update.validate(&job)?;
    update.apply(&mut job);

    let job = state.storage.update_job(job).await?;
    Ok(Json(JobResponse {
        job: JobWithCompany { job, company },
    }))
}

/// GET /api/jobs/:id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobApplicationsResponse>, AppError> {
    let job = state.storage.get_job(id).await?.ok_or_else(job_not_found)?;
    ensure_can_manage(&user, &job.job)?;
    let applications = state.storage.list_applications_by_job(id).await?;
    Ok(Json(JobApplicationsResponse { applications }))
}

/// GET /api/search?q=
pub async fn handle_search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let q = non_blank(query.q)
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;
    let jobs = state.storage.search_jobs(&q, SEARCH_LIMIT).await?;
    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<JobStats>, AppError> {
    Ok(Json(state.storage.job_stats().await?))
}
