//! Helpers for driving the full router in tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use crate::{create_router, AppState};

pub async fn setup_test_app() -> Router {
    create_router(AppState::for_tests().await, None).expect("router builds")
}

/// Send one request and return the status and the JSON body (`Null` if empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user named `name` and return its token
pub async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users/register",
        None,
        Some(json!({
            "name": name,
            "email": format!("{}@example.com", name),
            "password": "Kaninchen2024",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Create an animal and return its id
pub async fn create_animal(app: &Router, token: &str, body: Value) -> String {
    let (status, animal) = send(app, Method::POST, "/api/animals", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create animal failed: {}", animal);
    animal["id"].as_str().unwrap().to_string()
}
