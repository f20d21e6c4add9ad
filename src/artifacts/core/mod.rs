//! Shared byte-level and filesystem helpers
//!
//! - `codec`: delimiter-driven and fixed-width reads over `BufRead`
//! - `fs`: path-kind checks and atomic temp-file-and-rename writes

pub mod codec;
pub mod fs;
