//! Data model shared by the roster cleaning pipeline.
//!
//! Everything in this crate is plain data: the content fingerprint, the
//! output key layout derived from it, the typed user record the row
//! validator works on, and the values a run reports back to its caller.

pub mod columns;
pub mod fingerprint;
pub mod keys;
pub mod outcome;
pub mod record;

pub use columns::{REQUIRED_COLUMNS, VALID_TIERS, required_columns};
pub use fingerprint::Fingerprint;
pub use keys::OutputKeys;
pub use outcome::{ProcessingSummary, RunOutcome};
pub use record::UserRecord;
