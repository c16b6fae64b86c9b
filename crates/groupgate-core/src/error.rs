//! Error types for groupgate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("context canceled")]
    Cancelled,
}

impl GateError {
    /// Returns `true` for the not-found condition of a lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GateError::NotFound { .. })
    }
}

pub type GateResult<T> = Result<T, GateError>;
