//! Error types for raw file intake.

use thiserror::Error;

/// Errors raised while interpreting raw bytes as a table.
///
/// Every variant is fatal for the run: no partial table is produced.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input has no bytes besides a byte-order mark and blank lines.
    #[error("input is empty")]
    EmptyInput,

    /// The first line does not name any column.
    #[error("could not detect a header row")]
    NoHeader,

    /// The input starts with a byte-order mark for an encoding other than UTF-8.
    #[error("unsupported encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },

    /// The body could not be read as delimited text.
    #[error("failed to parse CSV: {message}")]
    CsvParse { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::CsvParse {
            message: err.to_string(),
        }
    }
}

/// Result type for intake operations.
pub type Result<T> = std::result::Result<T, IngestError>;
