//! Storage-level error markers.
//!
//! Repositories return `anyhow::Result`; the only storage failure the domain
//! needs to tell apart is a unique-constraint violation, which is wrapped in
//! [`UniqueViolation`] so it can be recovered with `downcast_ref`.

/// A write was rejected because it would duplicate a unique key
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct UniqueViolation {
    pub message: String,
}

impl UniqueViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convert a sqlx error into an anyhow error, tagging unique violations
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            UniqueViolation::new(message).into()
        }
        _ => err.into(),
    }
}

/// Like [`map_unique_violation`] for tables with several unique keys.
///
/// `messages` pairs a constrained column (`table.column`, as SQLite names it
/// in the error) with the message to report; the first pair is the fallback.
pub(crate) fn map_unique_violation_on(err: sqlx::Error, messages: &[(&str, &str)]) -> anyhow::Error {
    let detail = match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.message().to_string(),
        _ => return err.into(),
    };
    let message = messages
        .iter()
        .find(|(column, _)| detail.contains(*column))
        .or_else(|| messages.first())
        .map(|(_, message)| message.to_string())
        .unwrap_or(detail);
    UniqueViolation::new(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, "duplicate");
        assert!(err.downcast_ref::<UniqueViolation>().is_none());
        assert!(err.downcast_ref::<sqlx::Error>().is_some());
    }

    #[test]
    fn test_keyed_mapping_passes_other_errors_through() {
        let err = map_unique_violation_on(sqlx::Error::RowNotFound, &[("t.c", "taken")]);
        assert!(err.downcast_ref::<UniqueViolation>().is_none());
    }

    #[test]
    fn test_unique_violation_display_is_message() {
        let err: anyhow::Error = UniqueViolation::new("tattoo already assigned").into();
        assert_eq!(err.to_string(), "tattoo already assigned");
    }
}
