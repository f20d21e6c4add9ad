//! A minimal Git-compatible repository core
//!
//! - `areas`: stateful components (object store, index, refs, workspace, config)
//! - `artifacts`: on-disk data types and the algorithms over them
//! - `commands`: plumbing and porcelain commands driven by the binary
//! - `errors`: the error kinds every core operation reports

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

pub use errors::{Error, Result};
