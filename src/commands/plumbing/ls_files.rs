use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn ls_files(&self, verbose: bool, writer: &mut impl Write) -> anyhow::Result<()> {
        let index = self.read_index()?;

        if verbose {
            writeln!(
                writer,
                "Index file format version {} containing {} entries",
                index.version(),
                index.len()
            )?;
        }

        for entry in index.entries() {
            if verbose {
                let metadata = &entry.metadata;
                writeln!(
                    writer,
                    "{}\n  mode: {} sha: {}\n  size: {} inode: {} device: {}\n  mtime: {}.{:09} ctime: {}.{:09}",
                    entry.path,
                    metadata.mode.as_str(),
                    entry.oid,
                    metadata.size,
                    metadata.ino,
                    metadata.dev,
                    metadata.mtime,
                    metadata.mtime_nsec,
                    metadata.ctime,
                    metadata.ctime_nsec
                )?;
            } else {
                writeln!(writer, "{}", entry.path)?;
            }
        }

        Ok(())
    }
}
