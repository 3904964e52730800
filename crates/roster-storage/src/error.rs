//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from storage operations. None of them are retried locally.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// File I/O error.
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bucket or key cannot be mapped to a storage location.
    #[error("invalid object name '{name}': {reason}")]
    InvalidKey { name: String, reason: &'static str },

    /// A table could not be serialized for upload.
    #[error("failed to encode table: {message}")]
    Encode { message: String },
}

impl From<polars::prelude::PolarsError> for StorageError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Encode {
            message: err.to_string(),
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
