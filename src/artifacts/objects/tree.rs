//! Tree object
//!
//! Trees are directory snapshots: named entries pointing at blobs (files) and
//! other trees (subdirectories).
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<40-hex-digest>`
//!
//! ## Ordering
//!
//! Entries are sorted by name, where directory names compare as if they ended
//! in `/`. So `lib/` sorts after `lib.rs` but before `lib0`.

use crate::artifacts::core::codec;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::borrow::Cow;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    fn sort_key(&self) -> Cow<'_, str> {
        if self.mode.is_tree() {
            Cow::Owned(format!("{}/", self.name))
        } else {
            Cow::Borrowed(&self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree, putting the entries in canonical order
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.sort_key().as_bytes().cmp(b.sort_key().as_bytes()));
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    pub fn entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `<mode> <type> <oid>\t<name>` line per entry
    pub fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.mode.object_type(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            content.extend_from_slice(entry.mode.as_str().as_bytes());
            content.push(b' ');
            content.extend_from_slice(entry.name.as_bytes());
            content.push(0);
            content.extend_from_slice(entry.oid.as_ref().as_bytes());
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut entries = Vec::new();

        // clean EOF at an entry boundary ends the tree
        while let Some(mode) = codec::read_until(&mut reader, b' ', "tree entry mode")? {
            let mode = codec::utf8(mode, "tree entry mode")?;
            let mode = EntryMode::from_octal_str(&mode)?;

            let name = codec::expect_until(&mut reader, b'\0', "tree entry name")?;
            let name = codec::utf8(name, "tree entry name")?;

            let oid = codec::read_exact_bytes(&mut reader, OBJECT_ID_LENGTH, "tree entry id")?;
            let oid = codec::utf8(oid, "tree entry id")?;
            let oid = ObjectId::try_parse(&oid)
                .map_err(|_| Error::corrupt(format!("invalid object id in tree entry '{name}'")))?;

            entries.push(TreeEntry::new(mode, oid, name));
        }

        Ok(Tree::new(entries))
    }
}
