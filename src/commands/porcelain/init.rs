use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Create (or re-initialize) a repository at `path` and report where
    pub fn init_at(path: &Path, writer: &mut impl Write) -> anyhow::Result<Self> {
        let repository = Repository::init(path)
            .with_context(|| format!("unable to initialize repository in {}", path.display()))?;

        writeln!(
            writer,
            "Initialized empty Git repository in {}",
            repository.git_dir().display()
        )?;

        Ok(repository)
    }
}
