//! Runner and command-line components for the roster cleaning pipeline.

pub mod dedupe;
pub mod discover;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod summary;
