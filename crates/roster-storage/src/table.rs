//! Table upload helpers.

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::Result;
use crate::store::ObjectStore;

/// Content type used for every table upload.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Timestamps are written without fractional seconds.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize a table as CSV with a header row and no index column.
pub fn encode_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut frame = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_datetime_format(Some(DATETIME_FORMAT.to_string()))
        .finish(&mut frame)?;
    Ok(buffer)
}

/// Encode `df` and upload it as `text/csv`.
pub fn upload_table<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    key: &str,
    df: &DataFrame,
) -> Result<()> {
    let bytes = encode_csv(df)?;
    store.upload(bucket, key, &bytes, CSV_CONTENT_TYPE)
}

/// Encode `df` and upload it only if `key` is free.
pub fn upload_table_if_absent<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    key: &str,
    df: &DataFrame,
) -> Result<bool> {
    let bytes = encode_csv(df)?;
    store.upload_if_absent(bucket, key, &bytes, CSV_CONTENT_TYPE)
}
