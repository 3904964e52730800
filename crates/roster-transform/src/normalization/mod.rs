//! Normalization stages, applied in a fixed order.

mod columns;
mod datetime;
mod numeric;
mod text;

pub use columns::{canonical_column_name, canonicalize_column_names};
pub use datetime::{parse_timestamp, timestamp_dtype};
pub use numeric::parse_f64;
pub use text::{capitalize, normalize_text_fields};

use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

use roster_model::columns::{AGE, SIGNUP_DATE, USER_ID};

/// Normalize a raw table into a fresh DataFrame.
///
/// The input frame is not modified. Applying this function to its own
/// output returns an equal frame.
pub fn normalize_frame(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut out = canonicalize_column_names(df)?;
    let text_changed = normalize_text_fields(&mut out)?;
    coerce_types(&mut out)?;
    debug!(
        rows = out.height(),
        columns = out.width(),
        text_changed,
        "normalized table"
    );
    Ok(out)
}

/// Coerce `user_id` and `age` to numbers and `signup_date` to timestamps.
///
/// Returns the number of non-null source values that could not be coerced.
pub fn coerce_types(df: &mut DataFrame) -> PolarsResult<usize> {
    let mut unparsed = 0;
    for name in [USER_ID, AGE] {
        unparsed += numeric::coerce_numeric(df, name)?;
    }
    unparsed += datetime::coerce_timestamp(df, SIGNUP_DATE)?;
    if unparsed > 0 {
        debug!(unparsed, "values coerced to null");
    }
    Ok(unparsed)
}
