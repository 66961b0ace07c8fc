//! # REST API for Accounts
//!
//! Registration hands back a token straight away so a client can continue
//! without a separate login.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, post},
    Router,
};
use tracing::{info, warn};

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;
use shared::{MessageResponse, RegisterRequest, TokenResponse};

/// Create the account API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/", delete(delete_user))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/register - name: {}", request.name);

    let user = match state
        .user_service
        .register(UserMapper::to_register_command(request))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!("Registration rejected: {}", e);
            return ApiError::from(e).conflict_as_bad_request().into_response();
        }
    };

    match state.token_service.issue(&user.id) {
        Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
        Err(e) => ApiError::internal(e).into_response(),
    }
}

/// Delete the calling user and their profile
pub async fn delete_user(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("DELETE /api/users - user: {}", auth.user_id);

    match state.user_service.delete_user(&auth.user_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("User deleted"))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
