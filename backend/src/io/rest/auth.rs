//! Bearer token authentication for protected endpoints.
//!
//! Handlers that take an [`AuthUser`] argument only run once the
//! `Authorization: Bearer <token>` header carries a valid, unexpired token.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::auth::AuthError;
use crate::io::rest::error::ApiError;
use crate::AppState;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
}

/// parse a Bearer token from the Authorization header
fn parse_bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer_token)
            .ok_or_else(|| ApiError::unauthorized(AuthError::MissingToken.to_string()))?;

        let user_id = state.token_service.verify(token).map_err(|e| {
            debug!("Rejecting request to {}: {}", parts.uri.path(), e);
            ApiError::unauthorized(e.to_string())
        })?;

        Ok(AuthUser { user_id })
    }
}
