//! Index (staging area)
//!
//! The index tracks which file versions go into the next commit, together with
//! the stat data used to decide whether a file needs rehashing.
//!
//! ## Data Structures
//!
//! - `entries`: Maps repository-relative paths to their index entries
//! - `children`: Maps directory paths to the entries below them, so a file
//!   replacing a directory (or the reverse) can evict the conflicting entries

use crate::artifacts::core::{codec, fs};
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::index::index_tree::IndexTreeNode;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::{Error, Result};
use byteorder::{NetworkEndian, WriteBytesExt};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// What staging a path did to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Added,
    Updated,
    Unchanged,
    Removed,
}

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: PathBuf,
    version: u32,
    entries: BTreeMap<String, IndexEntry>,
    children: BTreeMap<String, BTreeSet<String>>,
}

impl Index {
    /// Create a new empty index backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Index {
            path: path.into(),
            version: 0,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Load the index from disk
    ///
    /// A missing or empty file is an empty index. Truncated data or bytes left
    /// over after the last entry are corrupt.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut index = Index::new(path);

        let Some(bytes) = fs::read_if_exists(&index.path)? else {
            tracing::trace!(path = %index.path.display(), "no index file, starting empty");
            return Ok(index);
        };
        if bytes.is_empty() {
            return Ok(index);
        }

        index.parse(&bytes)?;
        tracing::debug!(
            path = %index.path.display(),
            entries = index.entries.len(),
            "loaded index"
        );

        Ok(index)
    }

    fn parse(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::corrupt("index header is truncated"));
        }

        let mut reader = Cursor::new(bytes);
        self.version = codec::read_u32(&mut reader, "index version")?;
        let entries_count = codec::read_u32(&mut reader, "index entry count")?;

        for _ in 0..entries_count {
            let entry = IndexEntry::deserialize(&mut reader)?;
            self.store_entry(entry);
        }

        let consumed = reader.position() as usize;
        if consumed != bytes.len() {
            return Err(Error::corrupt(format!(
                "index has {} trailing bytes after {entries_count} entries",
                bytes.len() - consumed
            )));
        }

        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let entries_count = u32::try_from(self.entries.len())
            .map_err(|_| Error::corrupt("too many index entries"))?;

        let mut bytes = Vec::new();
        for field in [self.version, entries_count] {
            bytes
                .write_u32::<NetworkEndian>(field)
                .map_err(|e| Error::corrupt(format!("failed encoding index header: {e}")))?;
        }
        for entry in self.entries.values() {
            bytes.extend_from_slice(&entry.serialize()?);
        }

        Ok(bytes)
    }

    /// Write the index to disk via a temp file and rename
    pub fn store(&self) -> Result<()> {
        fs::atomic_write(&self.path, &self.serialize()?)?;
        tracing::debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "stored index"
        );

        Ok(())
    }

    /// Add or refresh an entry
    ///
    /// An entry already present is only replaced when the new stat data is
    /// strictly newer than what was recorded.
    pub fn stage(&mut self, entry: IndexEntry) -> StageOutcome {
        let outcome = match self.entries.get(&entry.path) {
            None => StageOutcome::Added,
            Some(existing) if entry.metadata.is_newer_than(&existing.metadata) => {
                StageOutcome::Updated
            }
            Some(_) => return StageOutcome::Unchanged,
        };

        self.discard_conflicts(&entry);
        self.store_entry(entry);

        outcome
    }

    /// The recorded entry for `path` is at least as new as `stat`
    pub fn is_fresh(&self, path: &str, stat: &EntryMetadata) -> bool {
        self.entries
            .get(path)
            .is_some_and(|entry| !stat.is_newer_than(&entry.metadata))
    }

    /// Remove a file entry, or every entry below a directory
    pub fn remove(&mut self, path: &str) {
        self.remove_entry(path);
        self.remove_children(path);
    }

    pub fn entry(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn tracked_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path is either a staged file or a directory containing staged files
    pub fn is_directly_tracked(&self, path: &str) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    /// Project the flat entries into a directory hierarchy
    pub fn to_tree(&self) -> IndexTreeNode {
        IndexTreeNode::build(self.entries.values())
    }

    /// Evict entries that cannot coexist with `entry`: files named like one of
    /// its parent directories, and anything below a directory of its name.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.path);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_string())
                .or_default()
                .insert(entry.path.clone());
        }

        self.entries.insert(entry.path.clone(), entry);
    }

    fn remove_children(&mut self, path: &str) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &str) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn entry(path: &str, mtime: u32) -> IndexEntry {
        IndexEntry::new(
            path.to_string(),
            ObjectId::from_bytes(path.as_bytes()),
            EntryMetadata {
                mtime,
                ctime: mtime,
                size: path.len() as u32,
                ..Default::default()
            },
        )
    }

    fn paths(index: &Index) -> Vec<&str> {
        index.tracked_paths().collect()
    }

    #[rstest]
    fn missing_file_loads_as_empty_version_zero(temp_dir: TempDir) {
        let index = Index::load(temp_dir.path().join("index")).unwrap();

        assert_eq!(index.version(), 0);
        assert!(index.is_empty());
    }

    #[rstest]
    fn empty_file_loads_as_empty(temp_dir: TempDir) {
        let path = temp_dir.path().join("index");
        std::fs::write(&path, b"").unwrap();

        assert!(Index::load(&path).unwrap().is_empty());
    }

    #[rstest]
    #[case::none(vec![])]
    #[case::one(vec!["README.md"])]
    #[case::nested(vec!["main.txt", "src/a.txt", "src/sub/b.txt"])]
    fn store_then_load_is_lossless(temp_dir: TempDir, #[case] files: Vec<&str>) {
        let path = temp_dir.path().join("index");
        let mut index = Index::new(&path);
        for file in &files {
            index.stage(entry(file, 1));
        }

        index.store().unwrap();
        let loaded = Index::load(&path).unwrap();

        assert_eq!(paths(&loaded), files);
        assert_eq!(
            loaded.entries().cloned().collect::<Vec<_>>(),
            index.entries().cloned().collect::<Vec<_>>()
        );
    }

    #[rstest]
    fn trailing_garbage_is_corrupt(temp_dir: TempDir) {
        let path = temp_dir.path().join("index");
        let mut index = Index::new(&path);
        index.stage(entry("a.txt", 1));

        let mut bytes = index.serialize().unwrap();
        bytes.push(0);
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(Index::load(&path), Err(Error::Corrupt(_))));
    }

    #[rstest]
    fn truncated_index_is_corrupt(temp_dir: TempDir) {
        let path = temp_dir.path().join("index");
        let mut index = Index::new(&path);
        index.stage(entry("a.txt", 1));

        let bytes = index.serialize().unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
        assert!(matches!(Index::load(&path), Err(Error::Corrupt(_))));

        std::fs::write(&path, &bytes[..5]).unwrap();
        assert!(matches!(Index::load(&path), Err(Error::Corrupt(_))));
    }

    #[test]
    fn stage_only_replaces_strictly_newer_entries() {
        let mut index = Index::new("index");

        assert_eq!(index.stage(entry("a.txt", 10)), StageOutcome::Added);
        assert_eq!(index.stage(entry("a.txt", 10)), StageOutcome::Unchanged);
        assert_eq!(index.stage(entry("a.txt", 9)), StageOutcome::Unchanged);
        assert_eq!(index.stage(entry("a.txt", 11)), StageOutcome::Updated);
        assert_eq!(index.entry("a.txt").map(|e| e.metadata.mtime), Some(11));
    }

    #[test]
    fn freshness_follows_the_stage_rule() {
        let mut index = Index::new("index");
        index.stage(entry("a.txt", 10));

        assert!(index.is_fresh("a.txt", &entry("a.txt", 10).metadata));
        assert!(!index.is_fresh("a.txt", &entry("a.txt", 12).metadata));
        assert!(!index.is_fresh("b.txt", &entry("b.txt", 1).metadata));
    }

    #[test]
    fn replaces_file_with_directory() {
        let mut index = Index::new("index");
        index.stage(entry("alice.txt", 1));
        index.stage(entry("bob.txt", 1));

        index.stage(entry("alice.txt/nested.txt", 1));

        assert_eq!(paths(&index), vec!["alice.txt/nested.txt", "bob.txt"]);
    }

    #[test]
    fn replaces_directory_having_nested_children_with_file() {
        let mut index = Index::new("index");
        index.stage(entry("alice.txt", 1));
        index.stage(entry("nested/bob.txt", 1));
        index.stage(entry("nested/inner/claire.txt", 1));

        index.stage(entry("nested", 1));

        assert_eq!(paths(&index), vec!["alice.txt", "nested"]);
        assert!(!index.is_directly_tracked("nested/inner"));
    }

    #[test]
    fn remove_drops_directories_recursively() {
        let mut index = Index::new("index");
        index.stage(entry("keep.txt", 1));
        index.stage(entry("dir/a.txt", 1));
        index.stage(entry("dir/sub/b.txt", 1));

        index.remove("dir");

        assert_eq!(paths(&index), vec!["keep.txt"]);
    }
}
