//! Blob object
//!
//! Blobs store file content. They carry no name or permissions; those live in
//! the tree that references them.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::core::codec;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let content = codec::read_to_end(&mut reader)?;
        Ok(Self::new(content.into()))
    }
}
