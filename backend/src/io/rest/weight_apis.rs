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
use crate::io::rest::extract::{ApiJson, ApiQuery};
use crate::io::rest::mappers::WeightMapper;
use crate::AppState;
use shared::{WeightRangeQuery, WeightRequest};

/// Create the weight series API router, nested under /api/animals
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/weight", get(list_weights).post(record_weight))
}

/// Record one measurement; a second value for the same day replaces the first
pub async fn record_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(animal_id): Path<String>,
    ApiJson(request): ApiJson<WeightRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals/{}/weight - user: {}", animal_id, auth.user_id);

    match state
        .weight_service
        .record_measurement(&animal_id, WeightMapper::to_command(request), &auth.user_id)
        .await
    {
        Ok(bucket) => (StatusCode::OK, Json(WeightMapper::to_dto(bucket))).into_response(),
        Err(e) => {
            warn!("Failed to record weight for {}: {}", animal_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Monthly buckets between `from` and `to`
pub async fn list_weights(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(animal_id): Path<String>,
    ApiQuery(query): ApiQuery<WeightRangeQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/animals/{}/weight - from: {:?}, to: {:?}",
        animal_id, query.from, query.to
    );

    match state
        .weight_service
        .query(&animal_id, WeightMapper::to_range_query(query))
        .await
    {
        Ok(buckets) => (StatusCode::OK, Json(WeightMapper::to_dto_list(buckets))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
