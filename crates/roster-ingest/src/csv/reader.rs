//! CSV parsing from in-memory bytes.

use std::borrow::Cow;
use std::io::Cursor;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::error::{IngestError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Strips a UTF-8 byte-order mark and rejects UTF-16 ones.
fn strip_bom(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes))
}

/// Removes physical lines that are empty or whitespace-only, unless they
/// sit inside a quoted field.
fn drop_blank_lines(content: &[u8]) -> Cow<'_, [u8]> {
    let mut kept = Vec::with_capacity(content.len());
    let mut in_quotes = false;
    let mut dropped = 0usize;
    for line in content.split_inclusive(|b| *b == b'\n') {
        if !in_quotes && line.iter().all(u8::is_ascii_whitespace) {
            dropped += 1;
        } else {
            kept.extend_from_slice(line);
        }
        let quotes = line.iter().filter(|b| **b == b'"').count();
        if quotes % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }
    if dropped == 0 {
        Cow::Borrowed(content)
    } else {
        debug!(dropped, "skipped blank lines");
        Cow::Owned(kept)
    }
}

/// True when polars had to invent every column name.
fn header_is_blank(df: &DataFrame) -> bool {
    df.get_column_names()
        .iter()
        .enumerate()
        .all(|(index, name)| {
            let name = name.as_str();
            let base = name
                .rfind("_duplicated_")
                .map_or(name, |at| &name[..at]);
            base.trim().is_empty() || name == format!("column_{}", index + 1)
        })
}

/// Parses delimited text with a header row into a DataFrame.
///
/// Every column is read as `String`; empty fields are null. Type coercion is
/// left to normalization. Malformed input fails as a whole.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    let content = drop_blank_lines(strip_bom(bytes)?);
    if content.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(content.into_owned()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            message: e.to_string(),
        })?;
    if header_is_blank(&df) {
        return Err(IngestError::NoHeader);
    }

    debug!(rows = df.height(), columns = df.width(), "parsed CSV input");
    Ok(df)
}
