//! Partitioning a table into accepted and invalid rows.

use std::collections::BTreeMap;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use crate::error::Result;
use crate::record::records_from_frame;
use crate::rules::{RowRule, check_row};
use crate::schema::validate_schema;

/// The two row-disjoint, union-complete partitions of a validated table.
///
/// Both partitions keep the input's columns and original row order.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub accepted: DataFrame,
    pub invalid: DataFrame,
    /// Rejected-row count per violated rule. A row counts once per rule it breaks.
    pub rejections: BTreeMap<RowRule, usize>,
}

impl ValidationOutcome {
    /// Rejection counts keyed by rule code, for summaries.
    pub fn rejection_codes(&self) -> BTreeMap<String, usize> {
        self.rejections
            .iter()
            .map(|(rule, count)| (rule.code().to_string(), *count))
            .collect()
    }
}

/// Split rows by the business rules without checking the schema.
pub fn partition_rows(df: &DataFrame) -> Result<ValidationOutcome> {
    let records = records_from_frame(df)?;
    let mut keep = Vec::with_capacity(records.len());
    let mut reject = Vec::with_capacity(records.len());
    let mut rejections: BTreeMap<RowRule, usize> = BTreeMap::new();

    for record in &records {
        let violations = check_row(record);
        let valid = violations.is_empty();
        for rule in violations {
            *rejections.entry(rule).or_insert(0) += 1;
        }
        keep.push(valid);
        reject.push(!valid);
    }

    let accepted = df.filter(&BooleanChunked::from_slice("accepted".into(), &keep))?;
    let invalid = df.filter(&BooleanChunked::from_slice("invalid".into(), &reject))?;

    debug!(
        accepted = accepted.height(),
        invalid = invalid.height(),
        ?rejections,
        "partitioned rows"
    );
    Ok(ValidationOutcome {
        accepted,
        invalid,
        rejections,
    })
}

/// Check the schema, then partition rows.
///
/// A schema failure returns before any row is evaluated.
pub fn validate_frame(df: &DataFrame) -> Result<ValidationOutcome> {
    validate_schema(df.get_column_names().into_iter().map(|name| name.as_str()))?;
    partition_rows(df)
}
