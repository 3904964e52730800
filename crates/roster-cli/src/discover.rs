//! Input discovery for one-shot scans.

use std::path::Path;

use roster_storage::{ObjectStore, Result};

/// Default prefix scanned for raw uploads.
pub const RAW_PREFIX: &str = "raw/";

/// Lists keys under `prefix` whose extension matches `extension`.
///
/// The comparison is case-insensitive and ignores a leading dot in
/// `extension`. Returns keys sorted lexicographically.
pub fn discover_inputs<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    prefix: &str,
    extension: &str,
) -> Result<Vec<String>> {
    let wanted = extension.trim_start_matches('.');
    let mut keys: Vec<String> = store
        .list(bucket, prefix)?
        .into_iter()
        .filter(|key| {
            Path::new(key)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
        })
        .collect();
    keys.sort();
    Ok(keys)
}
