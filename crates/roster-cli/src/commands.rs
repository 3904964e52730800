//! Subcommand implementations.

use std::fs;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, info_span};

use roster_cli::discover::discover_inputs;
use roster_cli::pipeline::PipelineRunner;
use roster_cli::summary::FailedRun;
use roster_ingest::fingerprint;
use roster_model::{OutputKeys, RunOutcome};
use roster_storage::FsObjectStore;

use crate::cli::{FingerprintArgs, RunArgs, ScanArgs};

/// Outcomes of a scan, in discovery order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub outcomes: Vec<RunOutcome>,
    pub failures: Vec<FailedRun>,
}

impl ScanResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn has_aborted(&self) -> bool {
        self.outcomes.iter().any(RunOutcome::is_aborted)
    }
}

pub fn run_file(args: &RunArgs) -> Result<RunOutcome> {
    let runner = PipelineRunner::new(FsObjectStore::new(args.store.store_root.clone()));
    runner
        .run(&args.store.bucket, &args.key)
        .with_context(|| format!("process {}/{}", args.store.bucket, args.key))
}

pub fn run_scan(args: &ScanArgs) -> Result<ScanResult> {
    let bucket = &args.store.bucket;
    let scan_span = info_span!("scan", bucket = %bucket, prefix = %args.prefix);
    let _scan_guard = scan_span.enter();

    let store = FsObjectStore::new(args.store.store_root.clone());
    let keys = discover_inputs(&store, bucket, &args.prefix, &args.extension)
        .with_context(|| format!("list inputs under {bucket}/{}", args.prefix))?;
    info!(count = keys.len(), "discovered input files");

    let runner = PipelineRunner::new(&store);
    let mut result = ScanResult::default();
    for key in keys {
        match runner.run(bucket, &key) {
            Ok(outcome) => result.outcomes.push(outcome),
            Err(run_error) => {
                result.failures.push(FailedRun {
                    file: key,
                    error: run_error.to_string(),
                });
            }
        }
    }
    Ok(result)
}

pub fn run_fingerprint(args: &FingerprintArgs) -> Result<serde_json::Value> {
    let bytes = fs::read(&args.path)
        .with_context(|| format!("read {}", args.path.display()))?;
    let fingerprint = fingerprint(&bytes);
    let keys = OutputKeys::for_fingerprint(&fingerprint);
    Ok(json!({
        "path": args.path.display().to_string(),
        "fingerprint": fingerprint,
        "accepted_key": keys.accepted,
        "invalid_key": keys.invalid,
    }))
}
