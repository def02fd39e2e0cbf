//! Error types for the ranking engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during vote and feed operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Target, voter, or parent entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied an out-of-range vote value or pagination bound
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Concurrent update on the same target detected; safe to retry
    #[error("Conflicting update: {0}")]
    Conflict(String),

    /// Persistence collaborator failed or retries were exhausted
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EngineError {
    /// Whether the operation may be retried with the same arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => EngineError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) => {
                // 40001 = serialization_failure, 40P01 = deadlock_detected
                match db_err.code().as_deref() {
                    Some("40001") | Some("40P01") => EngineError::Conflict(err.to_string()),
                    _ => EngineError::StoreUnavailable(err.to_string()),
                }
            }
            _ => EngineError::StoreUnavailable(err.to_string()),
        }
    }
}
