//! Timestamp coercion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsResult, Series, TimeUnit};

/// Storage type for coerced timestamps.
pub fn timestamp_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%d-%b-%Y %H:%M",
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S", // European, when the US reading fails
        "%d/%m/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",  // US: 01/15/2024
        "%d/%m/%Y",  // European: 15/01/2024
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%d.%m.%Y",  // German: 15.01.2024
        "%Y%m%d",    // Compact: 20240115
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Parse a timestamp from common date and datetime spellings.
///
/// Offsets are converted to UTC; date-only values land on midnight.
///
/// # Examples
///
/// ```
/// use roster_transform::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01").is_some());
/// assert!(parse_timestamp("2024-01-01T10:30:00Z").is_some());
/// assert!(parse_timestamp("").is_none());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed)
        .or_else(|| try_parse_date(trimmed).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

/// Replace column `name` with a millisecond `Datetime` column.
///
/// Absent columns are skipped. Returns how many non-null values became null.
pub(crate) fn coerce_timestamp(df: &mut DataFrame, name: &str) -> PolarsResult<usize> {
    let Ok(column) = df.column(name) else {
        return Ok(0);
    };
    if matches!(column.dtype(), DataType::Datetime(_, _)) {
        let recast = column.cast(&timestamp_dtype())?;
        df.with_column(recast)?;
        return Ok(0);
    }

    let text = column.cast(&DataType::String)?;
    let str_ca = text.str()?;
    let mut unparsed = 0;
    let millis: Vec<Option<i64>> = str_ca
        .into_iter()
        .map(|opt_val| {
            let value = opt_val?;
            let parsed = parse_timestamp(value).map(|dt| dt.and_utc().timestamp_millis());
            if parsed.is_none() {
                unparsed += 1;
            }
            parsed
        })
        .collect();

    let series = Series::new(name.into(), millis).cast(&timestamp_dtype())?;
    df.with_column(series)?;
    Ok(unparsed)
}
