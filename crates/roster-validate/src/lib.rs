//! Validation of normalized roster tables.
//!
//! Validation occurs in two phases:
//!
//! 1. **Schema**: every required column must be present (extra columns are
//!    tolerated). Fails fast with [`SchemaError`] naming the missing columns.
//! 2. **Rows**: each row is read into a typed [`UserRecord`] and checked
//!    against the business rules. Rows are split into accepted and invalid
//!    partitions; invalidity is data, never an error.
//!
//! [`UserRecord`]: roster_model::UserRecord

mod error;
mod partition;
mod record;
mod rules;
mod schema;

pub use error::{Result, SchemaError, ValidationError};
pub use partition::{ValidationOutcome, partition_rows, validate_frame};
pub use record::records_from_frame;
pub use rules::{RowRule, check_row, is_valid_email, is_valid_row};
pub use schema::{missing_columns, validate_schema};
