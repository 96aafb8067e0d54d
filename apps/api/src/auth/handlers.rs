//! `/api/auth/*` handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{LoginRequest, ProfileUpdate, RegisterRequest, User, UserSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    request.validate()?;

    if state
        .storage
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let user = state
        .storage
        .create_user(request.into_new_user(password_hash))
        .await?;
    let token = state.tokens.issue(user.id)?;

    info!(user_id = %user.id, role = ?user.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            token,
            user: user.summary(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    request.validate()?;

    let user = state
        .storage
        .get_user_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: user.summary(),
    }))
}

/// GET /api/auth/me
pub async fn handle_me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse { user })
}

/// PATCH /api/auth/me
pub async fn handle_update_me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    update.validate()?;
    let user = state
        .storage
        .update_user_profile(user.id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse { user }))
}
