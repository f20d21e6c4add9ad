//! The closed set of storable objects and their framing
//!
//! Each variant serialises only its body through [`Packable`]; [`Object`] adds
//! the `<type> <size>\0` header and computes the digest over the framed bytes.

use crate::artifacts::core::codec;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{BufRead, Cursor};

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
            Object::Tag(_) => ObjectType::Tag,
        }
    }

    /// Serialize the body without the framing header
    pub fn body(&self) -> Result<Bytes> {
        match self {
            Object::Blob(blob) => blob.serialize(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
            Object::Tag(tag) => tag.serialize(),
        }
    }

    /// Serialize as `<type> <size>\0<body>`
    pub fn encode(&self) -> Result<Bytes> {
        let body = self.body()?;
        let header = format!("{} {}\0", self.object_type(), body.len());

        let mut framed = Vec::with_capacity(header.len() + body.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(&body);

        Ok(Bytes::from(framed))
    }

    /// Parse framed bytes, checking the declared size against the body
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);

        let object_type = codec::expect_until(&mut reader, b' ', "object type")?;
        let object_type = codec::utf8(object_type, "object type")?;
        let object_type = ObjectType::try_from(object_type.as_str())
            .map_err(|_| Error::corrupt(format!("unknown object type '{object_type}'")))?;

        let size = codec::expect_until(&mut reader, b'\0', "object size")?;
        let size = codec::utf8(size, "object size")?;
        let size = size
            .parse::<usize>()
            .map_err(|_| Error::corrupt(format!("invalid object size '{size}'")))?;

        let remaining = data.len() - reader.position() as usize;
        if size != remaining {
            return Err(Error::corrupt(format!(
                "{object_type} declares {size} bytes but carries {remaining}"
            )));
        }

        match object_type {
            ObjectType::Blob => Ok(Object::Blob(Blob::deserialize(reader)?)),
            ObjectType::Tree => Ok(Object::Tree(Tree::deserialize(reader)?)),
            ObjectType::Commit => Ok(Object::Commit(Commit::deserialize(reader)?)),
            ObjectType::Tag => Ok(Object::Tag(Tag::deserialize(reader)?)),
        }
    }

    pub fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::from_bytes(&self.encode()?))
    }

    /// Human-readable rendering used by `cat-file -p`
    pub fn display(&self) -> Result<String> {
        match self {
            Object::Tree(tree) => Ok(tree.display()),
            _ => Ok(String::from_utf8_lossy(&self.body()?).to_string()),
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}

impl From<Tag> for Object {
    fn from(tag: Tag) -> Self {
        Object::Tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blob_digest_matches_git() {
        // `echo 'test content' | git hash-object --stdin`
        let blob = Object::Blob(Blob::new(Bytes::from_static(b"test content\n")));

        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "d670460b4b4aece5915caf5c68d12f560a9fe3e4"
        );
    }

    #[test]
    fn encode_frames_the_body() {
        let blob = Object::Blob(Blob::new(Bytes::from_static(b"hello")));

        assert_eq!(blob.encode().unwrap(), Bytes::from_static(b"blob 5\0hello"));
    }

    #[test]
    fn decode_rejects_size_mismatch() {
        let result = Object::decode(b"blob 10\0hello");

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let result = Object::decode(b"potato 1\0x");

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn decode_rejects_missing_header_terminator() {
        assert!(matches!(Object::decode(b"blob 5"), Err(Error::Corrupt(_))));
        assert!(matches!(Object::decode(b""), Err(Error::Corrupt(_))));
    }
}
