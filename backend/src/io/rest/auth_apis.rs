use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;
use shared::{LoginRequest, TokenResponse};

/// Create the authentication API router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(current_user).post(login))
}

/// Exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth");

    let user = match state
        .user_service
        .login(UserMapper::to_login_command(request))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!("Login failed: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    match state.token_service.issue(&user.id) {
        Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
        Err(e) => ApiError::internal(e).into_response(),
    }
}

/// The user behind the presented token
pub async fn current_user(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/auth - user: {}", auth.user_id);

    match state.user_service.current_user(&auth.user_id).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{register, send, setup_test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_and_current_user() {
        let app = setup_test_app().await;
        register(&app, "rexbreeder").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "email": "rexbreeder@example.com", "password": "Kaninchen2024" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, user) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["name"], "rexbreeder");
        assert_eq!(user["email"], "rexbreeder@example.com");
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let app = setup_test_app().await;
        register(&app, "rexbreeder").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "email": "rexbreeder@example.com", "password": "wrongpassword1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_invalid_tokens_are_rejected() {
        let app = setup_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/auth", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "No token, authorization denied");

        let (status, body) = send(&app, Method::GET, "/api/auth", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token is not valid");
    }
}
