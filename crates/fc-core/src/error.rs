//! # AppError
//!
//! The one error type returned by fc-core and fc-services. Ports speak
//! `anyhow`; services translate at the boundary so callers can branch on
//! what went wrong.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// No record of this entity carries the id (ship, component, job, notification).
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: String, id: String },

    /// A draft misses a required field, or a patch does not fit the record.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// No session, or bad credentials where a session is required.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Store write failed or a stored collection is malformed.
    #[error("internal service error: {0}")]
    Internal(String),

    /// References that do not line up, e.g. a component of another ship.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
