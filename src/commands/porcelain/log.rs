use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// Walk first parents from `revision` down to the root commit
    pub fn log(&self, revision: &str, oneline: bool, writer: &mut impl Write) -> anyhow::Result<()> {
        let start = match self.resolve_object_name(revision, Some(ObjectType::Commit)) {
            Ok(resolved) => resolved.oid,
            Err(e) if e.is_no_commits() => anyhow::bail!(
                "your current branch '{}' does not have any commits yet",
                self.get_active_branch()?.name
            ),
            Err(e) => return Err(e.into()),
        };

        let mut current = Some(start);
        let mut first = true;
        while let Some(commit_oid) = current {
            let commit = self.read_commit(&commit_oid)?;

            if oneline {
                writeln!(writer, "{} {}", commit_oid.to_short_oid(), commit.short_message())?;
            } else {
                if !first {
                    writeln!(writer)?;
                }
                show_commit_medium(&commit_oid, &commit, writer)?;
            }

            first = false;
            current = commit.parent().cloned();
        }

        Ok(())
    }
}

fn show_commit_medium(oid: &ObjectId, commit: &Commit, writer: &mut impl Write) -> anyhow::Result<()> {
    let author = Author::try_from(commit.author())?;

    writeln!(writer, "commit {oid}")?;
    writeln!(writer, "Author: {}", author.display_name())?;
    writeln!(writer, "Date:   {}", author.readable_timestamp())?;
    writeln!(writer)?;
    for line in commit.message().lines() {
        writeln!(writer, "    {line}")?;
    }

    Ok(())
}
