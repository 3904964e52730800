//! Text field canonicalization.

use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsResult, Series};

use roster_model::columns::{COUNTRY, EMAIL, SUBSCRIPTION_TIER, TEXT_COLUMNS};

/// Uppercase the first character and lowercase the rest.
///
/// This is a single leading capital, not per-word title case.
///
/// # Examples
///
/// ```
/// use roster_transform::capitalize;
///
/// assert_eq!(capitalize("brazil"), "Brazil");
/// assert_eq!(capitalize("UNITED STATES"), "United states");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    // Uppercasing may expand (`ß` to `SS`); only the first char of the
    // expansion stays uppercase.
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(value.len());
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

fn canonical_text(column: &str, value: &str) -> String {
    let trimmed = value.trim();
    match column {
        EMAIL | SUBSCRIPTION_TIER => trimmed.to_lowercase(),
        COUNTRY => capitalize(trimmed),
        _ => trimmed.to_string(),
    }
}

/// Trim the text columns and apply field-specific casing.
///
/// Nulls stay null. Returns the number of values that changed.
pub fn normalize_text_fields(df: &mut DataFrame) -> PolarsResult<usize> {
    let mut changed = 0;
    for name in TEXT_COLUMNS {
        if df.column(name).is_err() {
            continue;
        }
        let column = df.column(name)?.cast(&DataType::String)?;
        let str_ca = column.str()?;
        let mut values: Vec<Option<String>> = Vec::with_capacity(str_ca.len());
        for opt_val in str_ca.into_iter() {
            values.push(opt_val.map(|value| {
                let canonical = canonical_text(name, value);
                if canonical != value {
                    changed += 1;
                }
                canonical
            }));
        }
        df.with_column(Series::new(name.into(), values))?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    #[test]
    fn test_capitalize_is_not_title_case() {
        assert_eq!(capitalize("new zealand"), "New zealand");
        assert_eq!(capitalize("bRAZIL"), "Brazil");
    }

    #[test]
    fn test_capitalize_expanding_first_char() {
        assert_eq!(capitalize("ßerlin"), "Sserlin");
        for value in ["ßerlin", "ŉorth", "éire", "İstanbul", "brazil", ""] {
            let once = capitalize(value);
            assert_eq!(capitalize(&once), once, "not stable for {value:?}");
        }
    }

    #[test]
    fn test_text_fields_are_canonicalized() {
        let mut df = DataFrame::new(vec![
            Series::new("name".into(), vec![Some("  Ana "), None]).into_column(),
            Series::new("email".into(), vec![Some(" A@X.com"), Some("b@x.com")]).into_column(),
            Series::new("country".into(), vec![Some("brazil "), Some("PERU")]).into_column(),
            Series::new("subscription_tier".into(), vec![Some("PREMIUM"), Some(" free")])
                .into_column(),
        ])
        .unwrap();

        let changed = normalize_text_fields(&mut df).unwrap();

        assert_eq!(changed, 6);
        let name = df.column("name").unwrap().str().unwrap();
        assert_eq!(name.get(0), Some("Ana"));
        assert_eq!(name.get(1), None);
        let email = df.column("email").unwrap().str().unwrap();
        assert_eq!(email.get(0), Some("a@x.com"));
        let country = df.column("country").unwrap().str().unwrap();
        assert_eq!(country.get(0), Some("Brazil"));
        assert_eq!(country.get(1), Some("Peru"));
        let tier = df.column("subscription_tier").unwrap().str().unwrap();
        assert_eq!(tier.get(0), Some("premium"));
        assert_eq!(tier.get(1), Some("free"));
    }

    #[test]
    fn test_missing_text_columns_are_skipped() {
        let mut df =
            DataFrame::new(vec![Series::new("email".into(), vec!["X@Y.COM"]).into_column()])
                .unwrap();

        normalize_text_fields(&mut df).unwrap();

        assert_eq!(df.width(), 1);
        let email = df.column("email").unwrap().str().unwrap();
        assert_eq!(email.get(0), Some("x@y.com"));
    }
}
