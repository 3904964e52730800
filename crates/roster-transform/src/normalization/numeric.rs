//! Numeric coercion.

use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsResult, Series};

/// Parses a string as a finite f64, returning None for invalid or empty strings.
///
/// # Examples
///
/// ```
/// use roster_transform::parse_f64;
///
/// assert_eq!(parse_f64(" 30 "), Some(30.0));
/// assert_eq!(parse_f64("1e2"), Some(100.0));
/// assert_eq!(parse_f64("thirty"), None);
/// assert_eq!(parse_f64("NaN"), None);
/// ```
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Replace column `name` with a `Float64` column, unparsable values as null.
///
/// Absent columns are skipped. Returns how many non-null values became null.
pub(crate) fn coerce_numeric(df: &mut DataFrame, name: &str) -> PolarsResult<usize> {
    let Ok(column) = df.column(name) else {
        return Ok(0);
    };
    if column.dtype() == &DataType::Float64 {
        return Ok(0);
    }

    let text = column.cast(&DataType::String)?;
    let str_ca = text.str()?;
    let mut unparsed = 0;
    let values: Vec<Option<f64>> = str_ca
        .into_iter()
        .map(|opt_val| {
            let value = opt_val?;
            let parsed = parse_f64(value);
            if parsed.is_none() {
                unparsed += 1;
            }
            parsed
        })
        .collect();

    df.with_column(Series::new(name.into(), values))?;
    Ok(unparsed)
}
