//! Error types for the repository core
//!
//! Every fallible operation of the object store, index, ignore matcher and
//! reference resolver returns one of these kinds. Callers match on the kind;
//! only the command line converts them into messages and exit codes.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by the repository core
#[derive(Debug, Error)]
pub enum Error {
    /// Object, reference or file is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// An object path is occupied by a directory
    #[error("object path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    /// Decompression or decode failure, malformed binary framing
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Object resolved but is not of the requested kind
    #[error("object {oid} is a {actual}, not a {expected}")]
    WrongType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// Name resolves to more than one object
    #[error("ambiguous reference '{name}': candidates are {}", format_candidates(.candidates))]
    Ambiguous {
        name: String,
        candidates: Vec<ObjectId>,
    },

    /// HEAD chain ends in an empty or missing ref
    #[error("no commits yet")]
    NoCommits,

    /// Ignore pattern is not a valid glob
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Malformed object id, ref name or object type name
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Path cannot be stored in the index
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Repository configuration is missing or unsupported
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying filesystem failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Error::Corrupt(message.into())
    }

    pub fn is_no_commits(&self) -> bool {
        matches!(self, Error::NoCommits)
    }
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(|oid| oid.to_short_oid())
        .collect::<Vec<_>>()
        .join(", ")
}
