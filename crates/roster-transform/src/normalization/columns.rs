//! Column name canonicalization.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, PolarsResult};
use tracing::warn;

/// Canonical form of a column name: trimmed, lowercased, spaces to underscores.
///
/// # Examples
///
/// ```
/// use roster_transform::canonical_column_name;
///
/// assert_eq!(canonical_column_name(" User ID "), "user_id");
/// assert_eq!(canonical_column_name("Subscription Tier"), "subscription_tier");
/// ```
pub fn canonical_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Rename every column to its canonical form.
///
/// Names that collide after canonicalization keep the first occurrence; later
/// ones receive the smallest free `_N` suffix starting at 2.
pub fn canonicalize_column_names(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let canonical = canonical_column_name(column.name());
        let name = if used.contains(&canonical) {
            let mut suffix = 2usize;
            let mut candidate = format!("{canonical}_{suffix}");
            while used.contains(&candidate) {
                suffix += 1;
                candidate = format!("{canonical}_{suffix}");
            }
            warn!(
                column = %column.name(),
                renamed = %candidate,
                "column name collides after canonicalization"
            );
            candidate
        } else {
            canonical
        };
        used.insert(name.clone());
        columns.push(column.clone().with_name(name.into()));
    }

    DataFrame::new(columns)
}
