//! CSV reading utilities.

mod reader;

pub use reader::read_csv_bytes;
