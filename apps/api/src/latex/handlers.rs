//! `/api/latex-templates/*` handlers. Templates are private: another user's
//! template answers 404, same as a missing one.

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::ai::enhance_resume;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::latex::generate_latex;
use crate::models::latex::{
    EnhanceResumeRequest, GenerateLatexRequest, LatexResumeData, LatexResumeTemplate,
    SaveTemplateRequest, TemplateRecord,
};
use crate::models::user::User;
use crate::models::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<LatexResumeTemplate>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: LatexResumeTemplate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLatexResponse {
    pub latex_content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResumeResponse {
    pub enhanced_data: LatexResumeData,
}

fn template_not_found() -> AppError {
    AppError::NotFound("Template not found".to_string())
}

async fn owned_template(
    state: &AppState,
    user: &User,
    id: Uuid,
) -> Result<LatexResumeTemplate, AppError> {
    state
        .storage
        .get_latex_template(id)
        .await?
        .filter(|t| t.user_id == user.id)
        .ok_or_else(template_not_found)
}

/// Empty `latexContent` means "render it for me".
fn into_record(user: &User, request: SaveTemplateRequest) -> TemplateRecord {
    let latex_content = if request.latex_content.trim().is_empty() {
        generate_latex(&request.resume_data)
    } else {
        request.latex_content
    };
    TemplateRecord {
        user_id: user.id,
        name: request.name.trim().to_string(),
        resume_data: request.resume_data,
        latex_content,
        is_default: request.is_default,
    }
}

/// GET /api/latex-templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<TemplateListResponse>, AppError> {
    let templates = state.storage.list_latex_templates(user.id).await?;
    Ok(Json(TemplateListResponse { templates }))
}

/// GET /api/latex-templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = owned_template(&state, &user, id).await?;
    Ok(Json(TemplateResponse { template }))
}

/// POST /api/latex-templates/generate
pub async fn handle_generate(
    AppJson(request): AppJson<GenerateLatexRequest>,
) -> Json<GenerateLatexResponse> {
    Json(GenerateLatexResponse {
        latex_content: generate_latex(&request.resume_data),
    })
}

/// POST /api/latex-templates/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    AppJson(request): AppJson<EnhanceResumeRequest>,
) -> Result<Json<EnhanceResumeResponse>, AppError> {
    let enhanced_data = enhance_resume(
        &state.llm,
        &request.resume_data,
        request.target_job_title.as_deref(),
    )
    .await?;
    Ok(Json(EnhanceResumeResponse { enhanced_data }))
}

/// POST /api/latex-templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<SaveTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), AppError> {
    request.validate()?;
    let template = state
        .storage
        .create_latex_template(into_record(&user, request))
        .await?;
    info!(template_id = %template.id, user_id = %user.id, "Saved LaTeX template");
    Ok((StatusCode::CREATED, Json(TemplateResponse { template })))
}

/// PUT /api/latex-templates/:id
pub async fn handle_update_template(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<SaveTemplateRequest>,
) -> Result<Json<TemplateResponse>, AppError> {
    request.validate()?;
    owned_template(&state, &user, id).await?;
    let template = state
        .storage
        .update_latex_template(id, into_record(&user, request))
        .await?
        .ok_or_else(template_not_found)?;
    Ok(Json(TemplateResponse { template }))
}

/// DELETE /api/latex-templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    owned_template(&state, &user, id).await?;
    if !state.storage.delete_latex_template(id).await? {
        return Err(template_not_found());
    }
    Ok(Json(MessageResponse {
        message: "Template deleted",
    }))
}
