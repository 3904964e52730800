//! Business-key deduplication of accepted rows.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};
use tracing::{debug, trace};

use crate::logging::redact_value;

/// Render a key cell for comparison. Null renders as empty.
fn key_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn format_numeric(v: f64) -> String {
    // -0.0 and 0.0 are the same id.
    let v = if v == 0.0 { 0.0 } else { v };
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Keep the first row for each `key` value, in original order.
///
/// Rows with a null or blank key are never collapsed. A frame without the
/// key column is returned unchanged. Returns the kept rows and the number
/// of rows dropped.
pub fn dedupe_by_key(df: &DataFrame, key: &str) -> PolarsResult<(DataFrame, usize)> {
    if df.height() == 0 {
        return Ok((df.clone(), 0));
    }
    let Ok(column) = df.column(key) else {
        return Ok((df.clone(), 0));
    };
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let rendered = key_string(column.get(idx).unwrap_or(AnyValue::Null));
        if rendered.trim().is_empty() {
            keep.push(true);
            continue;
        }
        let first = seen.insert(rendered.clone());
        if !first {
            trace!(row = idx, key_value = redact_value(&rendered), "dropping duplicate row");
        }
        keep.push(first);
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let deduped = df.filter(&mask)?;
    let removed = df.height() - deduped.height();
    if removed > 0 {
        debug!(key, removed, "collapsed duplicate rows");
    }
    Ok((deduped, removed))
}
