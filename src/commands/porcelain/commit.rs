use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use std::io::Write;

impl Repository {
    /// Commit the index with the author taken from the environment
    pub fn commit_index(&self, message: &str, writer: &mut impl Write) -> anyhow::Result<()> {
        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!("Aborting commit due to empty commit message");
        }

        let author = Author::load_from_env()?;
        let commit_id = self.commit(&format!("{message}\n"), &author)?;
        let commit = self.read_commit(&commit_id)?;

        let branch = self.get_active_branch()?;
        let branch = if branch.detached {
            "detached HEAD".to_string()
        } else {
            branch.name
        };
        let is_root = match commit.parent() {
            Some(_) => "",
            None => " (root-commit)",
        };

        writeln!(
            writer,
            "[{}{} {}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
