use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::{Error, Result};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

/// A file recorded in the HEAD commit's tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct HeadEntry {
    pub mode: EntryMode,
    pub oid: ObjectId,
}

pub type HeadTree = BTreeMap<String, HeadEntry>;

/// Three-way comparison of HEAD, the index and the working tree
///
/// Every list is sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub staged: Vec<(String, IndexChangeType)>,
    pub unstaged: Vec<(String, WorkspaceChangeType)>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn collect(&self, index: &Index) -> Result<StatusReport> {
        let inspector = Inspector::new(self.repository);
        let head_tree = self.load_head_tree()?;

        let mut file_stats = BTreeMap::<String, EntryMetadata>::new();
        let mut untracked = BTreeSet::<String>::new();
        for path in self.repository.workspace().list_files()? {
            if index.entry(&path).is_some() {
                let stat = self.repository.workspace().stat_file(&path)?;
                file_stats.insert(path, stat);
            } else if !self.repository.is_ignored_with(index, &path)? {
                untracked.insert(path);
            }
        }

        let mut staged = BTreeMap::new();
        let mut unstaged = BTreeMap::new();
        for entry in index.entries() {
            if let Some(change) =
                inspector.check_index_against_workspace(entry, file_stats.get(&entry.path))?
            {
                unstaged.insert(entry.path.clone(), change);
            }
            if let Some(change) =
                inspector.check_index_against_head_tree(Some(entry), head_tree.get(&entry.path))
            {
                staged.insert(entry.path.clone(), change);
            }
        }
        for (path, head_entry) in &head_tree {
            if index.entry(path).is_none()
                && let Some(change) = inspector.check_index_against_head_tree(None, Some(head_entry))
            {
                staged.insert(path.clone(), change);
            }
        }

        Ok(StatusReport {
            staged: staged.into_iter().collect(),
            unstaged: unstaged.into_iter().collect(),
            untracked: untracked.into_iter().collect(),
        })
    }

    /// Files of the HEAD commit's tree; empty before the first commit
    fn load_head_tree(&self) -> Result<HeadTree> {
        match self.repository.refs().read_head() {
            Ok(head) => {
                let commit = self.repository.read_commit(&head)?;
                self.repository.flatten_tree(commit.tree_oid())
            }
            Err(Error::NoCommits) => Ok(HeadTree::new()),
            Err(e) => Err(e),
        }
    }
}
