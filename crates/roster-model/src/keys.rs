//! Output object keys derived from a fingerprint.

use serde::Serialize;

use crate::fingerprint::Fingerprint;

/// Prefix for accepted (cleaned) outputs.
pub const PROCESSED_PREFIX: &str = "processed/";
/// Prefix for rejected rows and schema-failure dumps.
pub const ERRORS_PREFIX: &str = "errors/";

/// The pair of output locations for one fingerprint.
///
/// Keys are a pure function of the fingerprint, so reprocessing identical
/// content always targets the same objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputKeys {
    pub accepted: String,
    pub invalid: String,
}

impl OutputKeys {
    pub fn for_fingerprint(fingerprint: &Fingerprint) -> Self {
        Self {
            accepted: format!("{PROCESSED_PREFIX}users_cleaned_{fingerprint}.csv"),
            invalid: format!("{ERRORS_PREFIX}invalid_rows_{fingerprint}.csv"),
        }
    }
}
