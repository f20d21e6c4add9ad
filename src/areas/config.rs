//! Repository configuration (`.git/config`)
//!
//! Only a subset of the INI dialect is understood: `[section]` and
//! `[section "subsection"]` headers, `key = value` lines and bare `key` lines
//! (which read as `true`). Section names and keys are case-insensitive;
//! subsection names are not. A subsection is addressed as `section.sub`.

use crate::artifacts::core::fs;
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SECTION_REGEX: &str = r#"^\[\s*([A-Za-z0-9.\-]+)(?:\s+"((?:[^"\\]|\\.)*)")?\s*\]$"#;
const ENTRY_REGEX: &str = r"^([A-Za-z][A-Za-z0-9\-]*)(?:\s*=\s*(.*))?$";

/// Only format version understood by this implementation
pub const REPOSITORY_FORMAT_VERSION: u32 = 0;

#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Configuration written into a freshly initialised repository
    pub fn default_content() -> String {
        format!(
            "[core]\n\trepositoryformatversion = {REPOSITORY_FORMAT_VERSION}\n\tfilemode = true\n\tbare = false\n"
        )
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_if_exists(&path)?
            .ok_or_else(|| Error::Config(format!("missing {}", path.display())))?;
        let content = String::from_utf8(content)
            .map_err(|_| Error::Config(format!("{} is not valid UTF-8", path.display())))?;

        let sections = Self::parse(&content)?;
        Ok(Config { path, sections })
    }

    fn parse(content: &str) -> Result<BTreeMap<String, BTreeMap<String, String>>> {
        let section_regex = regex::Regex::new(SECTION_REGEX)
            .map_err(|e| Error::Config(format!("invalid section regex: {e}")))?;
        let entry_regex = regex::Regex::new(ENTRY_REGEX)
            .map_err(|e| Error::Config(format!("invalid entry regex: {e}")))?;

        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(captures) = section_regex.captures(line) {
                let name = match captures.get(2) {
                    Some(sub) => format!(
                        "{}.{}",
                        captures[1].to_ascii_lowercase(),
                        unescape(sub.as_str())
                    ),
                    None => captures[1].to_ascii_lowercase(),
                };
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let (Some(section), Some(captures)) = (&current, entry_regex.captures(line)) else {
                return Err(Error::Config(format!(
                    "malformed config line {}: {line}",
                    number + 1
                )));
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(
                    captures[1].to_ascii_lowercase(),
                    captures
                        .get(2)
                        .map_or("true", |value| value.as_str().trim())
                        .to_string(),
                );
        }

        Ok(sections)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up `key` in `section`, where `section` may be `name.subsection`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = match section.split_once('.') {
            Some((name, sub)) => format!("{}.{sub}", name.to_ascii_lowercase()),
            None => section.to_ascii_lowercase(),
        };

        self.sections
            .get(&section)?
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Fail unless `core.repositoryformatversion` is the supported one
    pub fn validate(&self) -> Result<()> {
        let version = self
            .get("core", "repositoryformatversion")
            .ok_or_else(|| Error::Config("core.repositoryformatversion is not set".to_string()))?;

        match version.parse::<u32>() {
            Ok(REPOSITORY_FORMAT_VERSION) => Ok(()),
            _ => Err(Error::Config(format!(
                "unsupported repositoryformatversion {version}"
            ))),
        }
    }
}

/// Drop the backslashes of `\"` and `\\` escapes in a subsection name
fn unescape(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => name.extend(chars.next()),
            c => name.push(c),
        }
    }

    name
}
