//! Error taxonomy shared by all domain services.

use crate::storage::UniqueViolation;

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `tattoo.right`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Malformed, out-of-range or missing fields; carries every violation
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A uniqueness rule would be broken
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// The requester does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// The entity exists but is in the wrong state for the operation
    #[error("{0}")]
    InvalidState(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unexpected persistence failure; never shown to callers verbatim
    #[error("Storage failure: {0}")]
    Storage(anyhow::Error),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<UniqueViolation>() {
            Some(violation) => DomainError::Conflict(violation.message.clone()),
            None => DomainError::Storage(err),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
