//! Roster table normalization.
//!
//! Reduces formatting noise in a freshly parsed table before any business
//! rule is applied:
//!
//! - **Column names**: trimmed, lowercased, spaces replaced by underscores
//! - **Text fields**: `name`, `email`, `country`, `subscription_tier`
//!   trimmed; email and tier lowercased; country capitalized
//! - **Type coercion**: `user_id` and `age` to `Float64`, `signup_date` to
//!   millisecond `Datetime`; unparsable values become null
//!
//! Every step skips columns that are absent. Normalization never rejects
//! content; deciding what a null means is the validator's job.
//!
//! # Example
//!
//! ```ignore
//! use roster_transform::normalize_frame;
//!
//! let raw = roster_ingest::read_csv_bytes(&bytes)?;
//! let clean = normalize_frame(&raw)?;
//! ```

pub mod normalization;

pub use normalization::{
    canonical_column_name, canonicalize_column_names, capitalize, coerce_types, normalize_frame,
    normalize_text_fields, parse_f64, parse_timestamp, timestamp_dtype,
};
