use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::refs::reference::{validate_full_name, validate_short_name};
use crate::artifacts::refs::{HEAD_REF_NAME, HEADS_PREFIX, REF_ALIASES, TAGS_PREFIX};
use crate::errors::{Error, Result};
use std::collections::BTreeSet;

/// Shortest abbreviated digest accepted
const MIN_ABBREVIATED_OID_LENGTH: usize = 4;

/// A user-supplied name for an object.
///
/// Supports:
/// - `HEAD` (any case) and its alias `@`
/// - Branch and tag names: `main`, `v1.0`, `feature/new-feature`
/// - Full reference paths: `refs/heads/main`
/// - Full or abbreviated digests (4-40 hex characters)
///
/// Apart from HEAD, every interpretation that matches contributes a
/// candidate. A name that is both a tag and a digest prefix of a different
/// object is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

/// Outcome of resolving a [`Revision`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    pub oid: ObjectId,
    /// The name denotes the branch HEAD is on
    pub is_active_branch: bool,
}

impl Revision {
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidName("revision cannot be empty".to_string()));
        }

        let name = REF_ALIASES.get(name).copied().unwrap_or(name);
        Ok(Revision(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn is_head(&self) -> bool {
        self.0.eq_ignore_ascii_case(HEAD_REF_NAME)
    }

    pub fn looks_like_oid(name: &str) -> bool {
        (MIN_ABBREVIATED_OID_LENGTH..=OBJECT_ID_LENGTH).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Resolve to exactly one object, walking to `expected` when given
    pub fn resolve(
        &self,
        repository: &Repository,
        expected: Option<ObjectType>,
    ) -> Result<ResolvedRevision> {
        let mut candidates = self.candidates(repository)?;
        if candidates.len() > 1 {
            return Err(Error::Ambiguous {
                name: self.0.clone(),
                candidates: candidates.into_iter().collect(),
            });
        }
        let oid = candidates
            .pop_first()
            .ok_or_else(|| Error::NotFound(format!("revision '{}'", self.0)))?;

        let oid = match expected {
            Some(expected) => Self::coerce(repository, oid, expected)?,
            None => oid,
        };
        let is_active_branch = self.is_active_branch(repository)?;
        tracing::debug!(name = %self.0, oid = %oid, is_active_branch, "resolved revision");

        Ok(ResolvedRevision {
            oid,
            is_active_branch,
        })
    }

    /// Every object the name could denote, deduplicated
    pub fn candidates(&self, repository: &Repository) -> Result<BTreeSet<ObjectId>> {
        let refs = repository.refs();

        if self.is_head() {
            return Ok(BTreeSet::from([refs.read_head()?]));
        }

        let mut candidates = BTreeSet::new();

        if Self::looks_like_oid(&self.0) {
            candidates.extend(repository.database().find_objects_by_prefix(&self.0)?);
        }

        if validate_short_name(&self.0).is_ok() {
            for prefix in [TAGS_PREFIX, HEADS_PREFIX] {
                if let Some(oid) = refs.resolve(&format!("{prefix}{}", self.0))? {
                    candidates.insert(oid);
                }
            }
        }

        if self.0.starts_with("refs/")
            && validate_full_name(&self.0).is_ok()
            && let Some(oid) = refs.resolve(&self.0)?
        {
            candidates.insert(oid);
        }

        Ok(candidates)
    }

    /// Walk from `oid` to an object of kind `expected`
    ///
    /// Tags are followed to their target and commits to their tree; anything
    /// else of the wrong kind is an error.
    fn coerce(repository: &Repository, oid: ObjectId, expected: ObjectType) -> Result<ObjectId> {
        let mut oid = oid;

        loop {
            let object = repository.database().read(&oid)?;
            let actual = object.object_type();
            if actual == expected {
                return Ok(oid);
            }

            oid = match object {
                Object::Tag(tag) => tag.target().clone(),
                Object::Commit(commit) if expected == ObjectType::Tree => {
                    commit.tree_oid().clone()
                }
                _ => {
                    return Err(Error::WrongType {
                        oid,
                        expected,
                        actual,
                    });
                }
            };
            tracing::trace!(oid = %oid, from = %actual, "following object towards {expected}");
        }
    }

    fn is_active_branch(&self, repository: &Repository) -> Result<bool> {
        let active = repository.refs().get_active_branch()?;
        if active.detached {
            return Ok(false);
        }

        Ok(self.is_head()
            || self.0 == active.name
            || self.0.strip_prefix(HEADS_PREFIX) == Some(active.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abcd", true)]
    #[case("ABCDEF12", true)]
    #[case("abc", false)]
    #[case("abcg", false)]
    #[case(&"a".repeat(41), false)]
    fn oid_lookalikes(#[case] name: &str, #[case] looks_like_oid: bool) {
        assert_eq!(Revision::looks_like_oid(name), looks_like_oid);
    }

    #[test]
    fn at_sign_aliases_head() {
        assert_eq!(Revision::parse("@").unwrap().name(), "HEAD");
        assert!(Revision::parse("head").unwrap().is_head());
        assert!(matches!(Revision::parse("  "), Err(Error::InvalidName(_))));
    }
}
