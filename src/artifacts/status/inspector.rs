use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::status_info::HeadEntry;
use crate::errors::Result;
use derive_new::new;

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    fn is_content_changed(&self, index_entry: &IndexEntry) -> Result<bool> {
        let data = self.repository.workspace().read_file(&index_entry.path)?;
        let oid = Object::Blob(Blob::new(data)).object_id()?;

        Ok(oid != index_entry.oid)
    }

    /// Compare a staged entry with the file on disk
    ///
    /// Size or mode changes are modifications outright. When only the
    /// timestamps moved, the content is rehashed to decide.
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
        stat: Option<&EntryMetadata>,
    ) -> Result<Option<WorkspaceChangeType>> {
        match stat {
            None => Ok(Some(WorkspaceChangeType::Deleted)),
            Some(stat) if !entry.stat_match(stat) => Ok(Some(WorkspaceChangeType::Modified)),
            Some(stat) if entry.times_match(stat) => Ok(None),
            Some(_) if self.is_content_changed(entry)? => Ok(Some(WorkspaceChangeType::Modified)),
            Some(_) => Ok(None),
        }
    }

    pub fn check_index_against_head_tree(
        &self,
        index_entry: Option<&IndexEntry>,
        head_entry: Option<&HeadEntry>,
    ) -> Option<IndexChangeType> {
        match (index_entry, head_entry) {
            (Some(index_entry), Some(head_entry))
                if head_entry.mode != index_entry.metadata.mode
                    || head_entry.oid != index_entry.oid =>
            {
                Some(IndexChangeType::Modified)
            }
            (Some(_), None) => Some(IndexChangeType::Added),
            (None, Some(_)) => Some(IndexChangeType::Deleted),
            _ => None,
        }
    }
}
