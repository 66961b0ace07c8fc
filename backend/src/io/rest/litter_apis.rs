//! # REST API for Breeding Ledgers
//!
//! Each doe has at most one ledger; posting an event opens it on first use
//! and appends afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::LitterMapper;
use crate::AppState;
use shared::LitterEventRequest;

/// Create the breeding ledger API router, nested under /api/animals
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/litters", get(get_litter).post(record_litter))
}

/// Append a breeding event to the doe's ledger
pub async fn record_litter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doe_id): Path<String>,
    ApiJson(request): ApiJson<LitterEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals/{}/litters - user: {}, buck: {:?}", doe_id, auth.user_id, request.buck);

    match state
        .litter_service
        .record_event(&doe_id, LitterMapper::to_command(request), &auth.user_id)
        .await
    {
        Ok(litter) => (StatusCode::OK, Json(LitterMapper::to_dto(litter))).into_response(),
        Err(e) => {
            warn!("Failed to record litter for {}: {}", doe_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// The doe's ledger, `null` while nothing has been recorded
pub async fn get_litter(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(doe_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}/litters", doe_id);

    match state.litter_service.get_by_doe(&doe_id).await {
        Ok(litter) => (StatusCode::OK, Json(litter.map(LitterMapper::to_dto))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
