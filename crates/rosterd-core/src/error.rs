//! Error types for registration intake and storage.
//!
//! `CoreError` distinguishes validation failures from the several ways a
//! database write can fail. Callers that speak HTTP collapse the storage
//! variants into a single response; the distinction exists for logs and
//! tests.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by validation and storage operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A submitted form is missing one or more required fields, or a field
    /// was present but empty.
    #[error("missing required fields")]
    MissingFields,

    /// The database rejected a statement with a constraint violation.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A lookup matched no row.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other database failure: connection loss, pool exhaustion,
    /// closed pool, statement errors.
    #[error("database error: {0}")]
    Database(String),
}

impl CoreError {
    /// True when the error means the caller's input was rejected rather
    /// than the store failing.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::MissingFields)
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    CoreError::ConstraintViolation(db_err.to_string())
                } else if db_err.is_foreign_key_violation() {
                    CoreError::ConstraintViolation(db_err.to_string())
                } else if db_err.is_check_violation() {
                    CoreError::ConstraintViolation(db_err.to_string())
                } else {
                    CoreError::Database(db_err.to_string())
                }
            },
            other => CoreError::Database(other.to_string()),
        }
    }
}
