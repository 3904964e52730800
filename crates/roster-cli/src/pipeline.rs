//! Single-file cleaning pipeline with explicit stages.
//!
//! The runner walks one input through these stages in order:
//! 1. **Fingerprint**: SHA-256 of the raw bytes; derives both output keys
//! 2. **Idempotency check**: skip when the accepted output already exists
//! 3. **Parse**: CSV bytes to a text-typed table
//! 4. **Normalize**: column names, text fields, type coercion
//! 5. **Schema validate**: abort with an error dump if columns are missing
//! 6. **Row validate**: split rows into accepted and invalid partitions
//! 7. **Dedupe**: collapse accepted rows sharing a `user_id`
//! 8. **Write**: upload each non-empty partition
//! 9. **Summarize**: emit the processing summary
//!
//! Storage is injected through [`ObjectStore`]; the runner holds no other
//! state and can be shared between sequential runs.

use std::fmt;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, error, info, info_span, warn};

use roster_ingest::{fingerprint, read_csv_bytes};
use roster_model::columns::BUSINESS_KEY;
use roster_model::{Fingerprint, OutputKeys, ProcessingSummary, RunOutcome};
use roster_storage::{ObjectStore, upload_table, upload_table_if_absent};
use roster_transform::normalize_frame;
use roster_validate::{SchemaError, ValidationError, validate_frame};

use crate::dedupe::dedupe_by_key;
use crate::error::RunError;

/// Pipeline stage names, used in transition logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fingerprint,
    IdempotencyCheck,
    Parse,
    Normalize,
    SchemaValidate,
    RowValidate,
    Dedupe,
    Write,
    Summarize,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fingerprint => "fingerprint",
            Self::IdempotencyCheck => "idempotency_check",
            Self::Parse => "parse",
            Self::Normalize => "normalize",
            Self::SchemaValidate => "schema_validate",
            Self::RowValidate => "row_validate",
            Self::Dedupe => "dedupe",
            Self::Write => "write",
            Self::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enter(stage: Stage) {
    debug!(stage = %stage, "entering stage");
}

/// Runs the cleaning pipeline against an object store.
#[derive(Debug)]
pub struct PipelineRunner<S> {
    store: S,
}

impl<S: ObjectStore> PipelineRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Download `key` from `bucket` and process it.
    ///
    /// # Errors
    ///
    /// Fails when the download fails, or as [`process`](Self::process) does.
    /// Failures are logged before they are returned.
    pub fn run(&self, bucket: &str, key: &str) -> Result<RunOutcome, RunError> {
        let bytes = self
            .store
            .download(bucket, key)
            .inspect_err(|e| error!(file = key, error = %e, "run failed"))?;
        self.process(bucket, key, &bytes)
    }

    /// Process already-downloaded bytes for `key`.
    ///
    /// Outputs are written to `bucket` under keys derived from the content
    /// fingerprint. A schema failure is reported as
    /// [`RunOutcome::Aborted`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Parse`] when the bytes are not a well-formed
    /// table (nothing is written) and [`RunError::Storage`] when any storage
    /// call fails.
    pub fn process(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<RunOutcome, RunError> {
        let started = Instant::now();

        enter(Stage::Fingerprint);
        let fingerprint = fingerprint(bytes);
        let run_span = info_span!("run", file = key, fingerprint = %fingerprint);
        let _run_guard = run_span.enter();
        info!(bytes = bytes.len(), "processing file");

        let result = self.run_stages(bucket, key, bytes, fingerprint.clone(), started);
        if let Err(run_error) = &result {
            error!(file = key, fingerprint = %fingerprint, error = %run_error, "run failed");
        }
        result
    }

    /// Stages after fingerprinting, run inside the caller's span.
    fn run_stages(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        fingerprint: Fingerprint,
        started: Instant,
    ) -> Result<RunOutcome, RunError> {
        let keys = OutputKeys::for_fingerprint(&fingerprint);

        enter(Stage::IdempotencyCheck);
        if self.store.exists(bucket, &keys.accepted)? {
            info!(existing_key = %keys.accepted, "already processed");
            return Ok(RunOutcome::Skipped {
                file: key.to_string(),
                fingerprint,
                existing_key: keys.accepted,
            });
        }

        enter(Stage::Parse);
        let raw = {
            let _span = info_span!("parse").entered();
            read_csv_bytes(bytes)?
        };
        let total_rows = raw.height();
        debug!(rows = total_rows, columns = raw.width(), "parsed table");

        enter(Stage::Normalize);
        let normalized = {
            let _span = info_span!("normalize").entered();
            normalize_frame(&raw)?
        };
        drop(raw);

        enter(Stage::SchemaValidate);
        let validation = {
            let _span = info_span!("validate").entered();
            match validate_frame(&normalized) {
                Ok(outcome) => outcome,
                Err(ValidationError::Schema(schema_error)) => {
                    return self.abort(bucket, key, fingerprint, &keys, &normalized, schema_error);
                }
                Err(ValidationError::Frame(frame_error)) => return Err(frame_error.into()),
            }
        };
        enter(Stage::RowValidate);
        let rejections = validation.rejection_codes();
        debug!(?rejections, "row validation complete");

        enter(Stage::Dedupe);
        let (accepted, duplicates_removed) = {
            let _span = info_span!("dedupe").entered();
            dedupe_by_key(&validation.accepted, BUSINESS_KEY)?
        };
        if duplicates_removed > 0 {
            info!(duplicates_removed, "removed duplicate user_id rows");
        }

        enter(Stage::Write);
        {
            let _span = info_span!("write").entered();
            self.write_outputs(bucket, &keys, &accepted, &validation.invalid)?;
        }

        enter(Stage::Summarize);
        let summary = ProcessingSummary {
            file: key.to_string(),
            fingerprint,
            total_rows,
            accepted_rows: accepted.height(),
            invalid_rows: validation.invalid.height(),
            duplicates_removed,
            rejections,
            processing_time_seconds: ProcessingSummary::rounded_seconds(started.elapsed()),
        };
        info!(
            file = %summary.file,
            fingerprint = %summary.fingerprint,
            total_rows = summary.total_rows,
            accepted_rows = summary.accepted_rows,
            invalid_rows = summary.invalid_rows,
            processing_time_seconds = summary.processing_time_seconds,
            "processing summary"
        );
        Ok(RunOutcome::Processed(summary))
    }

    /// Dump the normalized table to the error key and stop.
    fn abort(
        &self,
        bucket: &str,
        key: &str,
        fingerprint: Fingerprint,
        keys: &OutputKeys,
        normalized: &DataFrame,
        schema_error: SchemaError,
    ) -> Result<RunOutcome, RunError> {
        error!(
            missing = ?schema_error.missing,
            error_key = %keys.invalid,
            "schema validation failed: {schema_error}"
        );
        upload_table(&self.store, bucket, &keys.invalid, normalized)?;
        Ok(RunOutcome::Aborted {
            file: key.to_string(),
            fingerprint,
            missing_columns: schema_error.missing,
            error_key: keys.invalid.clone(),
            total_rows: normalized.height(),
        })
    }

    /// Upload each partition that has at least one row.
    ///
    /// The accepted key doubles as the idempotency marker, so it is
    /// published last: a failed invalid upload leaves the run retryable.
    fn write_outputs(
        &self,
        bucket: &str,
        keys: &OutputKeys,
        accepted: &DataFrame,
        invalid: &DataFrame,
    ) -> Result<(), RunError> {
        if invalid.height() > 0 {
            upload_table(&self.store, bucket, &keys.invalid, invalid)?;
            debug!(key = %keys.invalid, rows = invalid.height(), "wrote invalid rows");
        }
        if accepted.height() > 0 {
            let created = upload_table_if_absent(&self.store, bucket, &keys.accepted, accepted)?;
            if created {
                debug!(key = %keys.accepted, rows = accepted.height(), "wrote accepted rows");
            } else {
                warn!(
                    key = %keys.accepted,
                    "accepted output appeared during the run; keeping the existing object"
                );
            }
        }
        Ok(())
    }
}
