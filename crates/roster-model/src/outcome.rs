//! Values a pipeline run hands back to its caller.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::Serialize;

use crate::fingerprint::Fingerprint;

/// Counts and timing for one processed file.
///
/// Not persisted by the pipeline; callers forward it to whatever
/// observability sink they use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingSummary {
    pub file: String,
    pub fingerprint: Fingerprint,
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub invalid_rows: usize,
    /// Accepted rows collapsed by business-key deduplication.
    pub duplicates_removed: usize,
    /// Rejected-row counts per violated rule. A row may count under several rules.
    pub rejections: BTreeMap<String, usize>,
    pub processing_time_seconds: f64,
}

impl ProcessingSummary {
    /// Rounds elapsed time to hundredths of a second.
    pub fn rounded_seconds(elapsed: Duration) -> f64 {
        (elapsed.as_secs_f64() * 100.0).round() / 100.0
    }
}

/// Terminal state of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Rows were partitioned and any non-empty partition was written.
    Processed(ProcessingSummary),
    /// Output for this content already exists; nothing was read or written.
    Skipped {
        file: String,
        fingerprint: Fingerprint,
        existing_key: String,
    },
    /// Required columns were missing; the normalized table was dumped to the
    /// error location and no accepted output was written.
    Aborted {
        file: String,
        fingerprint: Fingerprint,
        missing_columns: BTreeSet<String>,
        error_key: String,
        total_rows: usize,
    },
}

impl RunOutcome {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            Self::Processed(summary) => &summary.fingerprint,
            Self::Skipped { fingerprint, .. } | Self::Aborted { fingerprint, .. } => fingerprint,
        }
    }

    pub fn file(&self) -> &str {
        match self {
            Self::Processed(summary) => &summary.file,
            Self::Skipped { file, .. } | Self::Aborted { file, .. } => file,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    pub fn summary(&self) -> Option<&ProcessingSummary> {
        match self {
            Self::Processed(summary) => Some(summary),
            _ => None,
        }
    }
}
