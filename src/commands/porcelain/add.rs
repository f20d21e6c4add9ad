use crate::areas::index::StageOutcome;
use crate::areas::repository::Repository;
use crate::artifacts::core::fs::{self, PathKind};
use anyhow::Context;
use std::collections::BTreeSet;

impl Repository {
    /// Stage files and directories, storing the index once at the end
    ///
    /// Naming an ignored file is an error; ignored files found while
    /// expanding a directory are skipped. Tracked files that were deleted
    /// from the working tree leave the index.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.read_index()?;

        let mut targets = BTreeSet::new();
        for path in paths {
            let repo_path = self.pathspec(path)?;
            let absolute = self.path().join(&repo_path);
            let deleted = index
                .tracked_paths()
                .filter(|tracked| *tracked == repo_path || is_within(&repo_path, tracked))
                .filter(|tracked| !self.workspace().exists(tracked))
                .map(str::to_string)
                .collect::<Vec<_>>();

            match fs::path_kind(&absolute)? {
                PathKind::Missing if deleted.is_empty() => {
                    anyhow::bail!("pathspec '{path}' did not match any files")
                }
                PathKind::Missing => {}
                PathKind::File => {
                    if self.is_ignored_with(&index, &repo_path)? {
                        anyhow::bail!("path '{path}' is ignored by one of your ignore files");
                    }
                    targets.insert(repo_path);
                }
                PathKind::Directory => {
                    for file in self.workspace().list_files()? {
                        if is_within(&repo_path, &file)
                            && !self.is_ignored_with(&index, &file)?
                        {
                            targets.insert(file);
                        }
                    }
                }
            }
            targets.extend(deleted);
        }

        let mut changed = false;
        for path in targets {
            let outcome = self
                .stage_into(&mut index, &path)
                .with_context(|| format!("unable to add {path}"))?;
            changed |= outcome != StageOutcome::Unchanged;
        }

        if changed {
            index.store().context("unable to write index")?;
        }

        Ok(())
    }
}

/// Whether `file` lies below `dir` (the empty path is the root)
fn is_within(dir: &str, file: &str) -> bool {
    dir.is_empty()
        || file
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "a.txt", true)]
    #[case("src", "src/main.rs", true)]
    #[case("src", "src/nested/lib.rs", true)]
    #[case("src", "srcs/main.rs", false)]
    #[case("src", "src", false)]
    fn directory_prefix_is_component_aware(
        #[case] dir: &str,
        #[case] file: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_within(dir, file), expected);
    }
}
