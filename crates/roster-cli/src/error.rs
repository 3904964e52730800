//! Failures that end a run without an outcome.

use polars::prelude::PolarsError;
use roster_ingest::IngestError;
use roster_storage::StorageError;
use thiserror::Error;

/// A fatal run error.
///
/// Schema failures are not here: they are a handled outcome
/// ([`RunOutcome::Aborted`](roster_model::RunOutcome::Aborted)).
#[derive(Debug, Error)]
pub enum RunError {
    /// The input bytes are not a well-formed table. Nothing was written.
    #[error("failed to parse input: {0}")]
    Parse(#[from] IngestError),

    /// A download, upload or existence check failed.
    #[error("storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("DataFrame operation failed: {0}")]
    Frame(#[from] PolarsError),
}
