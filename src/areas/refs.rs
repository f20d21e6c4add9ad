//! References (branches, HEAD, tags)
//!
//! References are human-readable names for digests. They can be:
//! - Direct: containing a digest
//! - Symbolic: naming another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## Resolution
//!
//! Symbolic chains are followed for at most [`MAX_SYMREF_DEPTH`] hops, so a
//! cycle surfaces as a corrupt repository instead of a hang. A chain ending
//! in a missing or empty file is unresolved, which for HEAD means no commits.

use crate::artifacts::core::fs;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::reference::{RefValue, Reference, validate_full_name};
use crate::artifacts::refs::{HEAD_REF_NAME, HEADS_PREFIX, MAX_SYMREF_DEPTH};
use crate::errors::{Error, Result};
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    #[new(into)]
    path: PathBuf,
}

/// Branch HEAD is on, or whether HEAD is detached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBranch {
    pub name: String,
    pub detached: bool,
}

impl Refs {
    /// Read the raw value stored under `name`, if any
    pub fn read_value(&self, name: &str) -> Result<Option<RefValue>> {
        let ref_path = self.path.join(name);

        match fs::path_kind(&ref_path)? {
            fs::PathKind::File => {}
            fs::PathKind::Missing | fs::PathKind::Directory => return Ok(None),
        }

        let content = std::fs::read_to_string(&ref_path).map_err(|e| Error::io(&ref_path, e))?;
        RefValue::parse(&content)
    }

    /// Follow the chain starting at `name` to its last reference name
    ///
    /// `HEAD -> refs/heads/master` gives `refs/heads/master` even when the
    /// branch file does not exist yet.
    pub fn current_ref(&self, name: &str) -> Result<String> {
        self.follow(name).map(|(last, _)| last)
    }

    /// Follow the chain starting at `name` to a digest
    pub fn resolve(&self, name: &str) -> Result<Option<ObjectId>> {
        self.follow(name).map(|(_, oid)| oid)
    }

    fn follow(&self, name: &str) -> Result<(String, Option<ObjectId>)> {
        let mut current = name.to_string();

        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read_value(&current)? {
                Some(RefValue::Symbolic(target)) => {
                    validate_full_name(&target).map_err(|_| {
                        Error::corrupt(format!(
                            "symbolic reference '{current}' points outside refs: {target}"
                        ))
                    })?;
                    tracing::trace!(from = %current, to = %target, "following symbolic ref");
                    current = target;
                }
                Some(RefValue::Direct(oid)) => return Ok((current, Some(oid))),
                None => return Ok((current, None)),
            }
        }

        Err(Error::corrupt(format!(
            "symbolic reference chain from '{name}' exceeds {MAX_SYMREF_DEPTH} hops"
        )))
    }

    pub fn read_head(&self) -> Result<ObjectId> {
        self.resolve(HEAD_REF_NAME)?.ok_or(Error::NoCommits)
    }

    pub fn get_active_branch(&self) -> Result<ActiveBranch> {
        let current = self.current_ref(HEAD_REF_NAME)?;

        Ok(match current.strip_prefix(HEADS_PREFIX) {
            Some(branch) => ActiveBranch {
                name: branch.to_string(),
                detached: false,
            },
            None => ActiveBranch {
                name: current,
                detached: true,
            },
        })
    }

    pub fn write_ref(&self, reference: &Reference) -> Result<()> {
        validate_full_name(&reference.name)?;

        let ref_path = self.path.join(&reference.name);
        fs::atomic_write(&ref_path, reference.value.to_file_content().as_bytes())?;
        tracing::debug!(name = %reference.name, value = ?reference.value, "wrote reference");

        Ok(())
    }

    pub fn write_head(&self, value: RefValue) -> Result<()> {
        self.write_ref(&Reference::new(HEAD_REF_NAME.to_string(), value))
    }

    /// Point the branch HEAD is on at `oid`, or HEAD itself when detached
    pub fn update_head(&self, oid: ObjectId) -> Result<()> {
        let target = self.current_ref(HEAD_REF_NAME)?;
        self.write_ref(&Reference::new(target, RefValue::Direct(oid)))
    }

    /// Every resolvable reference under `refs/`, plus HEAD
    pub fn get_all_refs(&self) -> Result<BTreeMap<String, ObjectId>> {
        let mut refs = BTreeMap::new();

        for name in self.list_refs(&self.refs_path())? {
            if let Some(oid) = self.resolve(&name)? {
                refs.insert(name, oid);
            }
        }
        if let Some(oid) = self.resolve(HEAD_REF_NAME)? {
            refs.insert(HEAD_REF_NAME.to_string(), oid);
        }

        Ok(refs)
    }

    fn list_refs(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if fs::path_kind(path)? != fs::PathKind::Directory {
            return Ok(names);
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf());
                Error::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative_path) = entry.path().strip_prefix(&self.path) else {
                continue;
            };
            let name = relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }

        Ok(names)
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }
}
