use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the metadata directory inside a working tree
pub const METADATA_DIR: &str = ".git";

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Workspace { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file below the root, as sorted repository paths
    ///
    /// The metadata directory is never descended into.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.path.clone());
                Error::io(path, e.into())
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.path)
                .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
            files.push(Self::to_repo_path(relative_path)?);
        }
        files.sort();

        Ok(files)
    }

    /// Bytes a blob for `path` would hold; the target for symlinks
    pub fn read_file(&self, path: &str) -> Result<Bytes> {
        let file_path = self.path.join(path);
        let metadata = std::fs::symlink_metadata(&file_path).map_err(|e| Self::not_found(path, &file_path, e))?;

        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&file_path).map_err(|e| Error::io(&file_path, e))?;
            return Ok(Bytes::copy_from_slice(target.as_os_str().as_bytes()));
        }
        if metadata.is_dir() {
            return Err(Error::IsDirectory(file_path));
        }

        std::fs::read(&file_path)
            .map(Bytes::from)
            .map_err(|e| Error::io(&file_path, e))
    }

    pub fn stat_file(&self, path: &str) -> Result<EntryMetadata> {
        let file_path = self.path.join(path);
        let metadata = std::fs::symlink_metadata(&file_path).map_err(|e| Self::not_found(path, &file_path, e))?;

        (file_path.as_path(), metadata).try_into()
    }

    pub fn exists(&self, path: &str) -> bool {
        std::fs::symlink_metadata(self.path.join(path)).is_ok()
    }

    /// Repository path of `path`, which is absolute or relative to the root
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.path).map_err(|_| {
                Error::InvalidPath(format!("{} is outside the repository", path.display()))
            })?
        } else {
            path
        };

        Self::to_repo_path(relative)
    }

    /// Join normal components with `/`, rejecting anything that escapes the root
    pub fn to_repo_path(path: &Path) -> Result<String> {
        let mut components = Vec::new();

        for component in path.components() {
            match component {
                Component::Normal(name) => components.push(
                    name.to_str()
                        .ok_or_else(|| {
                            Error::InvalidPath(format!("{} is not valid UTF-8", path.display()))
                        })?
                        .to_string(),
                ),
                Component::CurDir => {}
                Component::ParentDir if components.pop().is_some() => {}
                _ => {
                    return Err(Error::InvalidPath(format!(
                        "{} is outside the repository",
                        path.display()
                    )));
                }
            }
        }

        Ok(components.join("/"))
    }

    fn not_found(path: &str, file_path: &Path, error: std::io::Error) -> Error {
        if error.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("file {path}"))
        } else {
            Error::io(file_path, error)
        }
    }
}
