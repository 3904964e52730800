//! Raw file intake for the roster pipeline.
//!
//! This crate turns the unparsed bytes of one input file into the two things
//! the rest of the pipeline needs:
//!
//! - **Fingerprint**: a SHA-256 content digest used as idempotency and
//!   naming key
//! - **Table**: a Polars DataFrame with every cell read as text
//!
//! # Example
//!
//! ```ignore
//! use roster_ingest::{fingerprint, read_csv_bytes};
//!
//! let bytes = std::fs::read("raw/users.csv")?;
//! let fp = fingerprint(&bytes);
//! let df = read_csv_bytes(&bytes)?;
//! ```

mod csv;
mod error;
mod fingerprint;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::read_csv_bytes;

// === Fingerprinting ===
pub use fingerprint::fingerprint;
