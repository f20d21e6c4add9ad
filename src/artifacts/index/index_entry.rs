//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - Repository-relative path (always `/`-separated)
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps)
//!
//! ## Entry Format
//!
//! ```text
//! u32 ctime_sec | u32 ctime_nsec | u32 mtime_sec | u32 mtime_nsec |
//! u32 dev | u32 ino | u32 mode | u32 uid | u32 gid | u32 size |
//! 40 bytes hex digest | u16 path length | path bytes
//! ```
//!
//! All integers are big-endian and entries are packed back to back.

use crate::artifacts::core::codec;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use byteorder::{NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::BufRead;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub path: String,
    /// SHA-1 hash of file content
    pub oid: ObjectId,
    /// File metadata (mode, size, timestamps)
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Ancestor directories, outermost first: `a/b/c` gives `["a", "a/b"]`
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.path
            .match_indices('/')
            .map(|(at, _)| &self.path[..at])
            .collect()
    }

    /// Size and mode agree, so the content may be unchanged
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.size == other.size && self.metadata.mode == other.mode
    }

    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }
}

/// File metadata stored in index entries
///
/// Both timestamps carry nanoseconds. Values are truncated to 32 bits, the
/// width they have on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl EntryMetadata {
    /// True when either timestamp of `self` is strictly later than the one in `recorded`
    pub fn is_newer_than(&self, recorded: &EntryMetadata) -> bool {
        (self.mtime, self.mtime_nsec) > (recorded.mtime, recorded.mtime_nsec)
            || (self.ctime, self.ctime_nsec) > (recorded.ctime, recorded.ctime_nsec)
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let path_length = u16::try_from(self.path.len())
            .map_err(|_| Error::InvalidPath(format!("path too long for the index: {}", self.path)))?;
        let metadata = &self.metadata;

        let mut entry_bytes = Vec::with_capacity(62 + self.path.len());
        for field in [
            metadata.ctime,
            metadata.ctime_nsec,
            metadata.mtime,
            metadata.mtime_nsec,
            metadata.dev,
            metadata.ino,
            metadata.mode.as_u32(),
            metadata.uid,
            metadata.gid,
            metadata.size,
        ] {
            entry_bytes
                .write_u32::<NetworkEndian>(field)
                .map_err(|e| Error::corrupt(format!("failed encoding index entry: {e}")))?;
        }
        entry_bytes.extend_from_slice(self.oid.as_ref().as_bytes());
        entry_bytes
            .write_u16::<NetworkEndian>(path_length)
            .map_err(|e| Error::corrupt(format!("failed encoding index entry: {e}")))?;
        entry_bytes.extend_from_slice(self.path.as_bytes());

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut fields = [0u32; 10];
        for field in fields.iter_mut() {
            *field = codec::read_u32(&mut reader, "index entry")?;
        }
        let [ctime, ctime_nsec, mtime, mtime_nsec, dev, ino, mode, uid, gid, size] = fields;

        let oid = codec::read_exact_bytes(&mut reader, OBJECT_ID_LENGTH, "index entry id")?;
        let oid = codec::utf8(oid, "index entry id")?;
        let oid = ObjectId::try_parse(&oid)
            .map_err(|_| Error::corrupt(format!("invalid object id '{oid}' in index")))?;

        let path_length = codec::read_u16(&mut reader, "index entry path length")?;
        let path = codec::read_exact_bytes(&mut reader, path_length as usize, "index entry path")?;
        let path = String::from_utf8(path)
            .map_err(|_| Error::InvalidPath("index entry path is not valid UTF-8".to_string()))?;

        Ok(IndexEntry {
            path,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode: EntryMode::try_from(mode)?,
                uid,
                gid,
                size,
            },
        })
    }
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else if metadata.file_type().is_symlink() {
            EntryMode::Symlink
        } else if file_path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}
