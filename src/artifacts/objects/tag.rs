//! Annotated tag object
//!
//! ## Format
//!
//! ```text
//! tag <size>\0
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <optional message>
//! ```

use crate::artifacts::core::codec;
use crate::artifacts::objects::commit::parse_header_oid;
use crate::artifacts::objects::headers::Headers;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::BufRead;

const REQUIRED_HEADERS: [&str; 3] = ["object", "tagger", "tag"];

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tag {
    target: ObjectId,
    headers: Headers,
    message: Option<String>,
}

impl Tag {
    /// Create a tag; an empty message is stored as no message
    pub fn new(
        target: ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &str,
        message: Option<String>,
    ) -> Self {
        let mut headers = Headers::default();
        headers.push("object", target.as_ref());
        headers.push("type", target_type.as_str());
        headers.push("tag", name);
        headers.push("tagger", tagger);

        Tag {
            target,
            headers,
            message: message.filter(|m| !m.is_empty()),
        }
    }

    pub fn from_headers(headers: Headers, message: Option<String>) -> Result<Self> {
        if let Some(missing) = headers.first_missing(&REQUIRED_HEADERS) {
            return Err(Error::corrupt(format!("tag is missing '{missing}'")));
        }
        let target = parse_header_oid(&headers, "object")?;

        Ok(Tag {
            target,
            headers,
            message: message.filter(|m| !m.is_empty()),
        })
    }

    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    /// Declared type of the target, when the tag records one
    pub fn target_type(&self) -> Option<ObjectType> {
        self.headers
            .get("type")
            .and_then(|t| ObjectType::try_from(t).ok())
    }

    pub fn name(&self) -> &str {
        self.headers.get("tag").unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Packable for Tag {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();
        self.headers.write_to(&mut content);
        if let Some(message) = &self.message {
            content.extend_from_slice(message.as_bytes());
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tag {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let headers = Headers::parse(&mut reader)?;
        let message = codec::utf8(codec::read_to_end(&mut reader)?, "tag message")?;

        Self::from_headers(headers, Some(message))
    }
}
