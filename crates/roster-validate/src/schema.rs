//! Required-column check.

use std::collections::BTreeSet;

use tracing::debug;

use roster_model::required_columns;

use crate::error::SchemaError;

/// Required columns absent from `present` (set difference).
pub fn missing_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    required_columns()
        .difference(&present)
        .map(|name| (*name).to_string())
        .collect()
}

/// Fail if any required column is missing. Extra columns are allowed.
pub fn validate_schema<'a>(
    present: impl IntoIterator<Item = &'a str>,
) -> std::result::Result<(), SchemaError> {
    let missing = missing_columns(present);
    if missing.is_empty() {
        debug!("schema check passed");
        return Ok(());
    }
    Err(SchemaError { missing })
}
