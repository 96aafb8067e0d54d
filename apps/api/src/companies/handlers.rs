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
use crate::models::company::{Company, CreateCompanyRequest};
use crate::models::user::User;
use crate::state::AppState;
use crate::storage::DEFAULT_COMPANY_PAGE;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Company,
}

/// GET /api/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<CompanyListResponse>, AppError> {
    let limit = page.limit.unwrap_or(DEFAULT_COMPANY_PAGE).clamp(1, 100);
    let offset = page.offset.unwrap_or(0).max(0);
    let companies = state.storage.list_companies(limit, offset).await?;
    Ok(Json(CompanyListResponse { companies }))
}

/// GET /api/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = state
        .storage
        .get_company(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(CompanyResponse { company }))
}

/// POST /api/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    request.validate()?;
    let company = state
        .storage
        .create_company(request.into_new_company(Some(user.id)))
        .await?;
    info!(company_id = %company.id, owner_id = %user.id, "Created company");
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}
