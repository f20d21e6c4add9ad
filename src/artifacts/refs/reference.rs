//! References and their on-disk values
//!
//! A reference file holds either `ref: <name>\n` (symbolic) or `<digest>\n`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::{
    HEAD_REF_NAME, HEADS_PREFIX, INVALID_REF_NAME_REGEX, SYMREF_REGEX, TAGS_PREFIX,
};
use crate::errors::{Error, Result};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    Symbolic(String),
    Direct(ObjectId),
}

impl RefValue {
    /// Parse a ref file body; an empty file holds no value yet
    pub fn parse(content: &str) -> Result<Option<Self>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let symref = regex::Regex::new(SYMREF_REGEX)
            .map_err(|e| Error::InvalidName(format!("invalid symref regex: {e}")))?;
        if let Some(captures) = symref.captures(content) {
            return Ok(Some(RefValue::Symbolic(captures[1].trim().to_string())));
        }

        ObjectId::try_parse(content)
            .map(|oid| Some(RefValue::Direct(oid)))
            .map_err(|_| Error::corrupt(format!("invalid reference content '{content}'")))
    }

    pub fn to_file_content(&self) -> String {
        match self {
            RefValue::Symbolic(target) => format!("ref: {target}\n"),
            RefValue::Direct(oid) => format!("{oid}\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Reference {
    pub name: String,
    pub value: RefValue,
}

impl Reference {
    pub fn branch(name: &str, oid: ObjectId) -> Result<Self> {
        validate_short_name(name)?;
        Ok(Reference::new(format!("{HEADS_PREFIX}{name}"), RefValue::Direct(oid)))
    }

    pub fn tag(name: &str, oid: ObjectId) -> Result<Self> {
        validate_short_name(name)?;
        Ok(Reference::new(format!("{TAGS_PREFIX}{name}"), RefValue::Direct(oid)))
    }
}

/// A name usable below `refs/heads/` or `refs/tags/`
pub fn validate_short_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("reference name cannot be empty".to_string()));
    }

    let invalid = regex::Regex::new(INVALID_REF_NAME_REGEX)
        .map_err(|e| Error::InvalidName(format!("invalid ref name regex: {e}")))?;
    if invalid.is_match(name) {
        return Err(Error::InvalidName(format!("invalid reference name: {name}")));
    }

    Ok(())
}

/// A full reference name: `HEAD` or a valid path under `refs/`
pub fn validate_full_name(name: &str) -> Result<()> {
    if name == HEAD_REF_NAME {
        return Ok(());
    }

    match name.strip_prefix("refs/") {
        Some(rest) => validate_short_name(rest),
        None => Err(Error::InvalidName(format!(
            "reference must be HEAD or live under refs/: {name}"
        ))),
    }
}
