//! Storage error types.
//!
//! Returned by the connection manager, bulk writer and range reader; none are
//! retried inside this crate.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store could not be opened or its schema could not be created.
    #[error("Storage unavailable: {cause}")]
    StorageUnavailable { cause: String },
    /// An operation ran before a successful open (or after close).
    #[error("Database not open")]
    NotOpen,
    /// An insert failed and the whole batch was rolled back. `mid` names the
    /// failing record, or is `None` when the transaction itself failed.
    #[error("Write failed ({}): {cause}", .mid.as_deref().unwrap_or("transaction"))]
    WriteFailed {
        mid: Option<String>,
        cause: String,
        duplicate_key: bool,
    },
    /// Cursor iteration failed; partial results were discarded.
    #[error("Read failed: {cause}")]
    ReadFailed { cause: String },
}

impl StorageError {
    pub(crate) fn unavailable(cause: impl ToString) -> Self {
        StorageError::StorageUnavailable {
            cause: cause.to_string(),
        }
    }

    pub(crate) fn read(cause: impl ToString) -> Self {
        StorageError::ReadFailed {
            cause: cause.to_string(),
        }
    }

    pub(crate) fn write(mid: Option<&str>, err: &sqlx::Error) -> Self {
        let duplicate_key = matches!(err, sqlx::Error::Database(db) if db.is_unique_violation());
        StorageError::WriteFailed {
            mid: mid.map(str::to_string),
            cause: err.to_string(),
            duplicate_key,
        }
    }

    pub(crate) fn malformed(mid: &str, err: &serde_json::Error) -> Self {
        StorageError::WriteFailed {
            mid: Some(mid.to_string()),
            cause: err.to_string(),
            duplicate_key: false,
        }
    }

    /// True for a write rejected because the primary key already exists.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            StorageError::WriteFailed {
                duplicate_key: true,
                ..
            }
        )
    }
}
