//! Commit object
//!
//! Commits record a snapshot: the root tree, the previous commit, who wrote it
//! and why.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha | 0000000000000000000000000000000000000000>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//! <any further headers, in their original order>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::headers::Headers;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::core::codec;
use crate::errors::{Error, Result};
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;

const REQUIRED_HEADERS: [&str; 4] = ["tree", "parent", "author", "committer"];

/// Author or committer identity
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format as "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load the identity from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE
    /// (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`). Without a date the current time is used.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }
}

impl Author {
    /// "Name <email>" without the timestamp
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Timestamp in the `Sun Jan 1 12:00:00 2023 +0200` form
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    /// Parse the "Name <email> timestamp timezone" header form
    fn try_from(value: &str) -> Result<Self> {
        let invalid = || Error::corrupt(format!("invalid identity: {value}"));

        let mut parts = value.rsplitn(3, ' ');
        let (Some(timezone), Some(timestamp), Some(identity)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let (name, email) = identity
            .trim_end()
            .strip_suffix('>')
            .and_then(|rest| rest.rsplit_once('<'))
            .ok_or_else(invalid)?;
        let timestamp = chrono::DateTime::parse_from_str(&format!("{timestamp} {timezone}"), "%s %z")
            .map_err(|_| invalid())?;

        Ok(Author::new_with_timestamp(
            name.trim().to_string(),
            email.to_string(),
            timestamp,
        ))
    }
}

/// Commit object
///
/// The headers are the source of truth for encoding; `tree_oid` and `parent`
/// are parsed from them once so callers never re-validate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    headers: Headers,
    message: String,
}

impl Commit {
    /// Create a commit; a missing parent is recorded as the all-zero sentinel
    pub fn new(
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: &Author,
        message: String,
    ) -> Self {
        let parent = parent.filter(|oid| !oid.is_no_parent());

        let mut headers = Headers::default();
        headers.push("tree", tree_oid.as_ref());
        headers.push(
            "parent",
            parent.clone().unwrap_or_else(ObjectId::no_parent).as_ref(),
        );
        headers.push("author", author.display());
        headers.push("committer", author.display());

        Commit {
            tree_oid,
            parent,
            headers,
            message,
        }
    }

    /// Build a commit from decoded headers, validating the required keys
    pub fn from_headers(headers: Headers, message: String) -> Result<Self> {
        if let Some(missing) = headers.first_missing(&REQUIRED_HEADERS) {
            return Err(Error::corrupt(format!("commit is missing '{missing}'")));
        }

        let tree_oid = parse_header_oid(&headers, "tree")?;
        let parent = Some(parse_header_oid(&headers, "parent")?).filter(|oid| !oid.is_no_parent());

        Ok(Commit {
            tree_oid,
            parent,
            headers,
            message,
        })
    }

    /// Append an extra header after the standard ones
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push(key, value);
        self
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    /// The parent commit, `None` for a root commit
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &str {
        self.headers.get("author").unwrap_or_default()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }
}

pub(crate) fn parse_header_oid(headers: &Headers, key: &str) -> Result<ObjectId> {
    let value = headers.get(key).unwrap_or_default();
    ObjectId::try_parse(value)
        .map_err(|_| Error::corrupt(format!("invalid object id in '{key}' header: {value}")))
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();
        self.headers.write_to(&mut content);
        content.extend_from_slice(self.message.as_bytes());

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let headers = Headers::parse(&mut reader)?;
        let message = codec::utf8(codec::read_to_end(&mut reader)?, "commit message")?;

        Self::from_headers(headers, message)
    }
}
