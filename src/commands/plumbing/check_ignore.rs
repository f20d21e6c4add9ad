use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Echo back every path that is ignored; returns how many were
    pub fn check_ignore(&self, paths: &[String], writer: &mut impl Write) -> anyhow::Result<usize> {
        let index = self.read_index()?;
        let mut ignored = 0;

        for path in paths {
            let repo_path = self.pathspec(path)?;
            if self.is_ignored_with(&index, &repo_path)? {
                writeln!(writer, "{path}")?;
                ignored += 1;
            }
        }

        Ok(ignored)
    }
}
