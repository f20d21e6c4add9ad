//! Ignore files
//!
//! A `.gitignore` applies to paths at or below the directory holding it. The
//! repository facade decides which files are in scope; this module only parses
//! a file and matches candidates relative to it.

pub mod ignore_rules;

/// Name of per-directory ignore files
pub const IGNORE_FILE_NAME: &str = ".gitignore";
