use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Resolves `Authorization: Bearer <token>` to a `User` and stores it as a
/// request extension for the handlers behind this layer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!("Rejected bearer token: {e}");
        AppError::Forbidden("Invalid token".to_string())
    })?;

    let user = state
        .storage
        .get_user(claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    debug!(user_id = %user.id, "Request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
