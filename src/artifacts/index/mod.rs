//! Index file format
//!
//! The index (staging area) records which file versions go into the next commit.
//!
//! ## File Format
//!
//! ```text
//! Header (8 bytes):
//!   - Version (u32)
//!   - Entry count (u32)
//!
//! Entries (variable length, packed):
//!   - Metadata, hex digest and length-prefixed path
//! ```
//!
//! Everything is big-endian; there is no padding and no trailing checksum.

pub mod entry_mode;
pub mod index_entry;
pub mod index_tree;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 8;
