//! Translation of domain failures into HTTP responses.
//!
//! Error bodies are `{"message": ...}`; validation failures are a JSON
//! array of `{"field", "message"}` objects.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::domain::DomainError;
use shared::{FieldError, MessageResponse};

const SERVER_ERROR: &str = "Server error";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with one entry per offending field
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Log the cause and answer with a generic 500
    pub fn internal(e: impl std::fmt::Display) -> Self {
        error!("Internal error: {}", e);
        Self::Internal(SERVER_ERROR.to_string())
    }

    /// Some routes have always answered duplicates with 400
    pub fn conflict_as_bad_request(self) -> Self {
        match self {
            Self::Conflict(msg) => Self::BadRequest(msg),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => Self::Validation(
                errors
                    .into_iter()
                    .map(|e| FieldError {
                        field: e.field,
                        message: e.message,
                    })
                    .collect(),
            ),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::NotFound(msg) => Self::NotFound(msg),
            DomainError::Forbidden(msg) => Self::Unauthorized(msg),
            DomainError::InvalidState(msg) => Self::BadRequest(msg),
            DomainError::InvalidCredentials => Self::BadRequest("Invalid credentials".to_string()),
            DomainError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                Self::Internal(SERVER_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Internal(msg) => (status, Json(MessageResponse::new(msg))).into_response(),
        }
    }
}
