//! End-to-end tests for the pipeline runner.

use std::collections::BTreeSet;

use roster_cli::error::RunError;
use roster_cli::pipeline::PipelineRunner;
use roster_ingest::{IngestError, read_csv_bytes};
use roster_model::{OutputKeys, RunOutcome};
use roster_storage::{FsObjectStore, MemoryObjectStore, ObjectStore, StorageError};

const BUCKET: &str = "uploads";
const HEADER: &str = "user_id,name,email,signup_date,country,age,subscription_tier\n";

fn csv(rows: &[&str]) -> Vec<u8> {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text.into_bytes()
}

fn column_values(bytes: &[u8], name: &str) -> Vec<String> {
    let df = read_csv_bytes(bytes).unwrap();
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_scenario_a_row_is_normalized_and_accepted() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = csv(&["1,Ana,A@X.com,2024-01-01,brazil,30,PREMIUM"]);

    let outcome = runner.process(BUCKET, "raw/a.csv", &bytes).unwrap();

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.total_rows, 1);
    assert_eq!(summary.accepted_rows, 1);
    assert_eq!(summary.invalid_rows, 0);

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    let accepted = store.get(BUCKET, &keys.accepted).unwrap();
    assert_eq!(accepted.content_type, "text/csv");
    assert_eq!(column_values(&accepted.bytes, "email"), vec!["a@x.com"]);
    assert_eq!(column_values(&accepted.bytes, "country"), vec!["Brazil"]);
    assert_eq!(column_values(&accepted.bytes, "subscription_tier"), vec!["premium"]);
    assert!(store.get(BUCKET, &keys.invalid).is_none());
}

#[test]
fn test_scenario_b_rows_are_rejected() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = csv(&[
        "1,Neg,neg@x.com,2024-01-01,peru,-5,free",
        "2,Pro,pro@x.com,2024-01-01,peru,30,pro",
        "3,Bad,not-an-email,2024-01-01,peru,30,free",
        "4,NoDate,nodate@x.com,,peru,30,free",
    ]);

    let outcome = runner.process(BUCKET, "raw/b.csv", &bytes).unwrap();

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.accepted_rows, 0);
    assert_eq!(summary.invalid_rows, 4);
    assert_eq!(summary.rejections["non_positive_age"], 1);
    assert_eq!(summary.rejections["unknown_tier"], 1);
    assert_eq!(summary.rejections["invalid_email"], 1);
    assert_eq!(summary.rejections["missing_signup_date"], 1);

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    assert!(store.get(BUCKET, &keys.accepted).is_none());
    let invalid = store.get(BUCKET, &keys.invalid).unwrap();
    assert_eq!(
        column_values(&invalid.bytes, "name"),
        vec!["Neg", "Pro", "Bad", "NoDate"]
    );
}

#[test]
fn test_scenario_c_duplicate_user_id_keeps_first() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = csv(&[
        "7,First,first@x.com,2024-01-01,peru,30,free",
        "8,Other,other@x.com,2024-01-02,chile,41,basic",
        "7,Second,second@x.com,2024-01-03,peru,25,enterprise",
    ]);

    let outcome = runner.process(BUCKET, "raw/c.csv", &bytes).unwrap();

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.accepted_rows, 2);
    assert_eq!(summary.duplicates_removed, 1);

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    let accepted = store.get(BUCKET, &keys.accepted).unwrap();
    assert_eq!(column_values(&accepted.bytes, "name"), vec!["First", "Other"]);
}

#[test]
fn test_rerun_on_identical_bytes_writes_nothing() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = csv(&[
        "1,Ana,ana@x.com,2024-01-01,brazil,30,free",
        "2,Bad,bad,2024-01-01,brazil,30,free",
    ]);

    let first = runner.process(BUCKET, "raw/users.csv", &bytes).unwrap();
    let writes_after_first = store.write_count();
    let keys = OutputKeys::for_fingerprint(first.fingerprint());
    let accepted_before = store.get(BUCKET, &keys.accepted).unwrap();

    let second = runner.process(BUCKET, "raw/copy.csv", &bytes).unwrap();

    assert_eq!(writes_after_first, 2);
    assert_eq!(store.write_count(), writes_after_first);
    assert_eq!(second.fingerprint(), first.fingerprint());
    assert_eq!(
        second,
        RunOutcome::Skipped {
            file: "raw/copy.csv".to_string(),
            fingerprint: first.fingerprint().clone(),
            existing_key: keys.accepted.clone(),
        }
    );
    assert_eq!(store.get(BUCKET, &keys.accepted).unwrap(), accepted_before);
}

#[test]
fn test_identical_bytes_give_identical_outputs() {
    let bytes = csv(&["1,Ana,ana@x.com,2024-01-01,brazil,30,free"]);
    let left = MemoryObjectStore::new();
    let right = MemoryObjectStore::new();

    let outcome = PipelineRunner::new(&left)
        .process(BUCKET, "raw/a.csv", &bytes)
        .unwrap();
    PipelineRunner::new(&right)
        .process(BUCKET, "raw/b.csv", &bytes)
        .unwrap();

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    assert_eq!(left.keys(BUCKET), right.keys(BUCKET));
    assert_eq!(
        left.get(BUCKET, &keys.accepted),
        right.get(BUCKET, &keys.accepted)
    );
}

#[test]
fn test_schema_failure_dumps_table_to_error_key() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = b"User ID,Name,Email,Signup Date,Subscription Tier\n\
                  1,Ana,ANA@X.COM,2024-01-01,FREE\n\
                  2,Bo,bo@x.com,2024-01-02,basic\n";

    let outcome = runner.process(BUCKET, "raw/partial.csv", bytes).unwrap();

    let RunOutcome::Aborted {
        missing_columns,
        error_key,
        total_rows,
        ..
    } = &outcome
    else {
        panic!("expected aborted outcome, got {outcome:?}");
    };
    let expected: BTreeSet<String> = ["age", "country"].map(String::from).into();
    assert_eq!(missing_columns, &expected);
    assert_eq!(*total_rows, 2);

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    assert_eq!(error_key, &keys.invalid);
    assert_eq!(store.keys(BUCKET), vec![keys.invalid.clone()]);

    let dump = store.get(BUCKET, &keys.invalid).unwrap();
    assert_eq!(column_values(&dump.bytes, "email"), vec!["ana@x.com", "bo@x.com"]);
    assert_eq!(column_values(&dump.bytes, "subscription_tier"), vec!["free", "basic"]);
}

#[test]
fn test_output_keys_derive_from_content() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);

    let outcome = runner
        .process(BUCKET, "raw/tiny.csv", b"user_id,email\n1,a@x.com\n")
        .unwrap();

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    insta::assert_snapshot!(
        keys.accepted,
        @"processed/users_cleaned_c8a39ecb28913c659c7e8c2256a664533f8a3aac3aee85bced2113fa50832dd5.csv"
    );
    insta::assert_snapshot!(
        keys.invalid,
        @"errors/invalid_rows_c8a39ecb28913c659c7e8c2256a664533f8a3aac3aee85bced2113fa50832dd5.csv"
    );
}

#[test]
fn test_parse_error_writes_nothing() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);

    let result = runner.process(BUCKET, "raw/empty.csv", b"");

    assert!(matches!(
        result,
        Err(RunError::Parse(IngestError::EmptyInput))
    ));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_malformed_body_is_parse_error() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let bytes = csv(&["1,Ana,ana@x.com,2024-01-01,brazil,30,free,extra,cells"]);

    let result = runner.process(BUCKET, "raw/ragged.csv", &bytes);

    assert!(matches!(result, Err(RunError::Parse(_))));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_missing_input_is_storage_error() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);

    let result = runner.run(BUCKET, "raw/missing.csv");

    assert!(matches!(
        result,
        Err(RunError::Storage(StorageError::NotFound { .. }))
    ));
}

#[test]
fn test_run_against_filesystem_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsObjectStore::new(dir.path());
    let bytes = csv(&[
        "1,Ana,ana@x.com,2024-01-01,brazil,30,free",
        "2,Bo,bo@x.com,2024-01-02,chile,0,free",
    ]);
    store
        .upload(BUCKET, "raw/users.csv", &bytes, "text/csv")
        .unwrap();
    let runner = PipelineRunner::new(store);

    let outcome = runner.run(BUCKET, "raw/users.csv").unwrap();

    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    assert!(dir.path().join(BUCKET).join(&keys.accepted).is_file());
    assert!(dir.path().join(BUCKET).join(&keys.invalid).is_file());

    let rerun = runner.run(BUCKET, "raw/users.csv").unwrap();
    assert!(matches!(rerun, RunOutcome::Skipped { .. }));
}

#[test]
fn test_lost_race_keeps_existing_accepted_output() {
    let store = MemoryObjectStore::new();
    let bytes = csv(&["1,Ana,ana@x.com,2024-01-01,brazil,30,free"]);
    let keys = OutputKeys::for_fingerprint(&roster_ingest::fingerprint(&bytes));

    // Another run publishes between our gate check and write.
    struct RacingStore<'a> {
        inner: &'a MemoryObjectStore,
        accepted_key: String,
    }
    impl ObjectStore for RacingStore<'_> {
        fn download(&self, bucket: &str, key: &str) -> roster_storage::Result<Vec<u8>> {
            self.inner.download(bucket, key)
        }
        fn upload(
            &self,
            bucket: &str,
            key: &str,
            bytes: &[u8],
            content_type: &str,
        ) -> roster_storage::Result<()> {
            self.inner.upload(bucket, key, bytes, content_type)
        }
        fn exists(&self, bucket: &str, key: &str) -> roster_storage::Result<bool> {
            let exists = self.inner.exists(bucket, key)?;
            if key == self.accepted_key {
                self.inner.insert(bucket, key, "winner");
            }
            Ok(exists)
        }
        fn list(&self, bucket: &str, prefix: &str) -> roster_storage::Result<Vec<String>> {
            self.inner.list(bucket, prefix)
        }
        fn upload_if_absent(
            &self,
            bucket: &str,
            key: &str,
            bytes: &[u8],
            content_type: &str,
        ) -> roster_storage::Result<bool> {
            self.inner.upload_if_absent(bucket, key, bytes, content_type)
        }
    }

    let runner = PipelineRunner::new(RacingStore {
        inner: &store,
        accepted_key: keys.accepted.clone(),
    });
    let outcome = runner.process(BUCKET, "raw/users.csv", &bytes).unwrap();

    assert!(matches!(outcome, RunOutcome::Processed(_)));
    assert_eq!(store.get(BUCKET, &keys.accepted).unwrap().bytes, b"winner");
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_blank_lines_do_not_become_rows() {
    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(&store);
    let mut bytes = csv(&["1,Ana,ana@x.com,2024-01-01,brazil,30,free", ""]);
    bytes.extend_from_slice(b"2,Bo,bo@x.com,2024-01-02,chile,41,basic\n\n");

    let outcome = runner.process(BUCKET, "raw/blank.csv", &bytes).unwrap();

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.accepted_rows, 2);
    assert_eq!(summary.invalid_rows, 0);
    let keys = OutputKeys::for_fingerprint(outcome.fingerprint());
    assert!(store.get(BUCKET, &keys.invalid).is_none());
}

#[test]
fn test_failed_invalid_upload_is_retried() {
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlakyStore<'a> {
        inner: &'a MemoryObjectStore,
        fail_errors_upload: AtomicBool,
    }
    impl ObjectStore for FlakyStore<'_> {
        fn download(&self, bucket: &str, key: &str) -> roster_storage::Result<Vec<u8>> {
            self.inner.download(bucket, key)
        }
        fn upload(
            &self,
            bucket: &str,
            key: &str,
            bytes: &[u8],
            content_type: &str,
        ) -> roster_storage::Result<()> {
            if key.starts_with("errors/") && self.fail_errors_upload.swap(false, Ordering::SeqCst)
            {
                return Err(StorageError::Io {
                    operation: "write",
                    path: key.into(),
                    source: std::io::Error::other("transient"),
                });
            }
            self.inner.upload(bucket, key, bytes, content_type)
        }
        fn exists(&self, bucket: &str, key: &str) -> roster_storage::Result<bool> {
            self.inner.exists(bucket, key)
        }
        fn list(&self, bucket: &str, prefix: &str) -> roster_storage::Result<Vec<String>> {
            self.inner.list(bucket, prefix)
        }
        fn upload_if_absent(
            &self,
            bucket: &str,
            key: &str,
            bytes: &[u8],
            content_type: &str,
        ) -> roster_storage::Result<bool> {
            self.inner.upload_if_absent(bucket, key, bytes, content_type)
        }
    }

    let store = MemoryObjectStore::new();
    let runner = PipelineRunner::new(FlakyStore {
        inner: &store,
        fail_errors_upload: AtomicBool::new(true),
    });
    let bytes = csv(&[
        "1,Ana,ana@x.com,2024-01-01,brazil,30,free",
        "2,Bo,not-an-email,2024-01-02,chile,41,basic",
    ]);
    let keys = OutputKeys::for_fingerprint(&roster_ingest::fingerprint(&bytes));

    let first = runner.process(BUCKET, "raw/users.csv", &bytes);
    assert!(matches!(first, Err(RunError::Storage(_))));
    assert!(store.get(BUCKET, &keys.accepted).is_none());

    let retry = runner.process(BUCKET, "raw/users.csv", &bytes).unwrap();
    assert!(matches!(retry, RunOutcome::Processed(_)));
    assert!(store.get(BUCKET, &keys.accepted).is_some());
    assert!(store.get(BUCKET, &keys.invalid).is_some());
}
