use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

/// Resolves the caller from the `Authorization: Bearer` header. Handlers that
/// take an `AuthUser` argument reject unauthenticated requests with 401
/// before any store access happens.
#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(|msg| {
            tracing::warn!("Authentication failed: {}", msg);
            ApiError::unauthorized(msg)
        })?;

        let user = state.identity.resolve(&token).await?;
        tracing::debug!("Authenticated user {}", user.id);
        Ok(user)
    }
}

/// Extract JWT token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Not authenticated".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
