use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{analyze_resume, ResumeAnalysisResult};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume_analysis::{AnalyzeResumeRequest, NewResumeAnalysis, ResumeAnalysis};
use crate::models::user::User;
use crate::resume::upload::{
    allowed_extension, extract_pdf_text, public_url, stored_file_name, MAX_UPLOAD_BYTES,
    RESUME_FIELD,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,
    pub resume_url: String,
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: ResumeAnalysisResult,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalysisListResponse {
    pub analyses: Vec<ResumeAnalysis>,
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge("File too large. Maximum size is 5MB.".to_string())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let Some(ext) = allowed_extension(&file_name) else {
            warn!(user_id = %user.id, %file_name, "Rejected upload with disallowed type");
            return Err(AppError::Validation(
                "Invalid file type. Only PDF, DOC, and DOCX files are allowed.".to_string(),
            ));
        };

        let data = field.bytes().await.map_err(multipart_error)?;
        let size = data.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(too_large());
        }

        let stored = stored_file_name(&ext);
        tokio::fs::create_dir_all(&state.config.upload_dir).await?;
        tokio::fs::write(state.config.upload_dir.join(&stored), &data).await?;

        let resume_url = public_url(&stored);
        state.storage.set_user_resume_url(user.id, &resume_url).await?;

        let resume_text = if ext == "pdf" {
            extract_pdf_text(data).await
        } else {
            None
        };

        info!(user_id = %user.id, %resume_url, size, "Resume uploaded");
        return Ok(Json(UploadResponse {
            message: "Resume uploaded successfully",
            resume_url,
            resume_text,
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// POST /api/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }

    let analysis = analyze_resume(
        &state.llm,
        &request.resume_text,
        request.target_job_title.as_deref(),
    )
    .await?;

    let saved = state
        .storage
        .create_resume_analysis(NewResumeAnalysis {
            user_id: user.id,
            resume_url: user.resume_url.clone().unwrap_or_default(),
            ats_score: analysis.ats_score,
            keyword_optimization: analysis.keyword_optimization,
            suggestions: analysis.suggestions.clone(),
            analysis_data: analysis.analysis_data.clone(),
        })
        .await?;

    Ok(Json(AnalyzeResponse {
        analysis,
        id: saved.id,
    }))
}

/// GET /api/resume/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let analyses = state.storage.list_resume_analyses(user.id).await?;
    Ok(Json(AnalysisListResponse { analyses }))
}
