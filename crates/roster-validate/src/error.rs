//! Validation error types.

use std::collections::BTreeSet;

use thiserror::Error;

/// Required columns are absent from the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", join_columns(.missing))]
pub struct SchemaError {
    /// Exactly the required columns not present (required minus present).
    pub missing: BTreeSet<String>,
}

fn join_columns(columns: &BTreeSet<String>) -> String {
    columns.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Errors returned by table validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns_sorted() {
        let err = SchemaError {
            missing: BTreeSet::from(["country".to_string(), "age".to_string()]),
        };
        assert_eq!(err.to_string(), "missing required columns: age, country");
    }
}
