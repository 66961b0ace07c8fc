//! Request extractors whose rejections answer like every other API error.
//!
//! Axum's own `Json` and `Query` reject malformed input with a plain-text
//! 422. These wrappers turn the rejection into an [`ApiError`] so a client
//! always gets a JSON body and a 400.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;
use tracing::debug;

use crate::io::rest::error::ApiError;

/// JSON request body
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// URL query string
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected JSON body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}
