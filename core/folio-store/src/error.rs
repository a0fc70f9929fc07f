//! Error types for the storage layer.

use folio_model::BackendError;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value failed to parse back into its typed form.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        BackendError::Database(err.to_string())
    }
}

impl From<uuid::Error> for StoreError {
    fn from(err: uuid::Error) -> Self {
        StoreError::InvalidData(err.to_string())
    }
}
