//! Command implementations
//!
//! Commands are grouped the way Git groups them:
//!
//! - `plumbing`: Low-level access to objects, the index and references
//! - `porcelain`: User-facing workflows (init, add, commit, tag, status)
//!
//! Every command is an `impl Repository` block that prints to the writer it
//! is handed, so the binary and the tests drive them the same way.

use crate::areas::repository::Repository;
use anyhow::Context;
use std::path::Path;

pub mod plumbing;
pub mod porcelain;

impl Repository {
    /// Repository path of `path`, taken relative to the current directory
    pub fn pathspec(&self, path: &str) -> anyhow::Result<String> {
        let cwd = std::env::current_dir().context("unable to read current directory")?;
        let absolute = cwd.join(Path::new(path));

        Ok(self.workspace().relative_path(&absolute)?)
    }
}
