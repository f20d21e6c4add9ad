//! Object types and their encoding
//!
//! Everything stored is one of four kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (tree, parent, author, message)
//! - **Tag**: Annotated reference to another object
//!
//! All objects are framed as `<type> <size>\0<content>` and identified by the
//! SHA-1 of the framed bytes.

pub mod blob;
pub mod commit;
pub mod headers;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
