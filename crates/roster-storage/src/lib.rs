//! Object storage for roster pipeline inputs and outputs.
//!
//! The pipeline only ever talks to storage through [`ObjectStore`]:
//! download, upload, existence check, and prefix listing over
//! `(bucket, key)` pairs. Stores are constructed explicitly and handed to
//! the runner; there is no process-wide client.
//!
//! - [`FsObjectStore`]: buckets are directories under a root
//! - [`MemoryObjectStore`]: in-process map, records writes for tests

mod error;
mod fs;
mod memory;
mod store;
mod table;

pub use error::{Result, StorageError};
pub use fs::FsObjectStore;
pub use memory::{MemoryObjectStore, StoredObject};
pub use store::ObjectStore;
pub use table::{CSV_CONTENT_TYPE, encode_csv, upload_table, upload_table_if_absent};
