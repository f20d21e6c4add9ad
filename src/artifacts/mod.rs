//! Data types and the algorithms over them
//!
//! - `core`: Binary decoding helpers and atomic file writes
//! - `ignore`: `.gitignore` rule parsing and matching
//! - `index`: Index entries, modes and the directory projection
//! - `objects`: Blob, tree, commit and tag objects
//! - `refs`: Reference values and revision resolution
//! - `status`: Working tree status inspection

pub mod core;
pub mod ignore;
pub mod index;
pub mod objects;
pub mod refs;
pub mod status;
