//! Pattern list from one ignore file
//!
//! Patterns are shell globs where `*` and `?` never cross a `/`. A pattern
//! without a `/` is tested against the candidate's file name; a pattern with
//! one is tested against the path relative to the ignore file's directory,
//! with a leading `/` only anchoring it there. A trailing `/` restricts a
//! pattern to directories.

use crate::errors::{Error, Result};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// Read patterns line by line, skipping blanks and `#` comments
    pub fn parse(content: &[u8]) -> Self {
        let patterns = String::from_utf8_lossy(content)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        IgnoreRules { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches `candidate`, a `/`-separated path relative
    /// to the directory these rules came from
    pub fn is_ignored(&self, candidate: &str, is_dir: bool) -> Result<bool> {
        let file_name = candidate.rsplit('/').next().unwrap_or(candidate);

        for raw in &self.patterns {
            let glob = match raw.strip_suffix('/') {
                Some(_) if !is_dir => continue,
                Some(dir_only) => dir_only,
                None => raw.as_str(),
            };

            let (glob, subject) = if glob.contains('/') {
                (glob.strip_prefix('/').unwrap_or(glob), candidate)
            } else {
                (glob, file_name)
            };

            let pattern = Pattern::new(glob).map_err(|e| Error::InvalidPattern {
                pattern: raw.clone(),
                reason: e.msg.to_string(),
            })?;

            if pattern.matches_with(subject, MATCH_OPTIONS) {
                tracing::trace!(pattern = %raw, candidate, "ignore pattern matched");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
