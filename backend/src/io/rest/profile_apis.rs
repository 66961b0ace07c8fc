//! # REST API for Profiles
//!
//! Profiles are public: lookups by handle or user need no token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use crate::domain::profile_service::HANDLE_EXISTS;
use crate::domain::DomainError;
use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::ProfileMapper;
use crate::AppState;
use shared::ProfileRequest;

/// Create the profile API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_profiles).post(create_profile).put(update_profile),
        )
        .route("/handle/:handle", get(get_profile_by_handle))
        .route("/user/:user_id", get(get_profile_by_user))
}

/// A taken handle has always been reported as a plain bad request
fn write_error(e: DomainError) -> ApiError {
    match e {
        DomainError::Conflict(msg) if msg == HANDLE_EXISTS => ApiError::BadRequest(msg),
        other => ApiError::from(other),
    }
}

/// List all profiles
pub async fn list_profiles(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/profiles");

    match state.profile_service.list_profiles().await {
        Ok(profiles) => (StatusCode::OK, Json(ProfileMapper::to_dto_list(profiles))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create the caller's profile
pub async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles - user: {}, handle: {:?}", auth.user_id, request.handle);

    match state
        .profile_service
        .create_profile(ProfileMapper::to_input(request), &auth.user_id)
        .await
    {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_dto(profile, None))).into_response(),
        Err(e) => {
            warn!("Failed to create profile: {}", e);
            write_error(e).into_response()
        }
    }
}

/// Update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profiles - user: {}", auth.user_id);

    match state
        .profile_service
        .update_profile(ProfileMapper::to_input(request), &auth.user_id)
        .await
    {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_dto(profile, None))).into_response(),
        Err(e) => {
            warn!("Failed to update profile: {}", e);
            write_error(e).into_response()
        }
    }
}

/// Get a profile by its handle
pub async fn get_profile_by_handle(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/handle/{}", handle);

    match state.profile_service.get_by_handle(&handle).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_owned_dto(profile))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get the profile of a user
pub async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/user/{}", user_id);

    match state.profile_service.get_by_user(&user_id).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_owned_dto(profile))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
