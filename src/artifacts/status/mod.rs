//! Working tree status inspection
//!
//! Reconciles three views of the working state: the HEAD commit's tree, the
//! index and the files on disk.
//!
//! ## Components
//!
//! - `file_change`: Change kinds and their labels
//! - `inspector`: Per-entry comparisons
//! - `status_info`: Aggregation into a sorted report

pub mod file_change;
pub mod inspector;
pub mod status_info;
