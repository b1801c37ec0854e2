//! Error types for the storage layer.

use thiserror::Error;
use userbase_model::UserId;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The UNIQUE constraint on `users.name` rejected the write.
    #[error("a user named {0:?} already exists")]
    DuplicateName(String),

    /// No row with this id.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Update called on a user that was never inserted.
    #[error("user has not been persisted")]
    NotPersisted,

    /// A thread panicked while holding the connection.
    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Maps a failed write to [`StoreError::DuplicateName`] when SQLite
    /// reports a constraint violation.
    pub(crate) fn from_write(err: rusqlite::Error, name: Option<&str>) -> Self {
        match (err.sqlite_error_code(), name) {
            (Some(rusqlite::ErrorCode::ConstraintViolation), Some(name)) => {
                Self::DuplicateName(name.to_string())
            }
            _ => Self::Database(err),
        }
    }
}
