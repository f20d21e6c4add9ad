//! Repository facade
//!
//! A [`Repository`] is a handle on one working tree and its metadata
//! directory. It composes the object store, index, references, ignore rules
//! and workspace, and is the only entry point the command layer uses.
//!
//! The handle keeps no state beyond paths and the parsed config: every call
//! reads from and writes to disk.

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::{Index, StageOutcome};
use crate::areas::refs::{ActiveBranch, Refs};
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::core::fs::{self, PathKind};
use crate::artifacts::ignore::IGNORE_FILE_NAME;
use crate::artifacts::ignore::ignore_rules::IgnoreRules;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_tree::IndexTreeNode;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::artifacts::refs::reference::{RefValue, Reference};
use crate::artifacts::refs::revision::{ResolvedRevision, Revision};
use crate::artifacts::refs::{HEADS_PREFIX, TAGS_PREFIX};
use crate::artifacts::status::status_info::{HeadEntry, HeadTree, Status, StatusReport};
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_BRANCH: &str = "master";
const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Tagger and message of an annotated tag
#[derive(Debug, Clone)]
pub struct TagAnnotation {
    pub tagger: Author,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    git_dir: PathBuf,
    config: Config,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Create the metadata layout under `path` and open it
    ///
    /// Files that already exist are left alone, so re-running on an existing
    /// repository is harmless.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::path_kind(path)? {
            PathKind::File => {
                return Err(Error::InvalidPath(format!("{} is not a directory", path.display())));
            }
            PathKind::Missing => fs::create_dir_all(path)?,
            PathKind::Directory => {}
        }

        let git_dir = path.join(METADATA_DIR);
        for dir in ["objects", "refs/heads", "refs/tags", "info"] {
            fs::create_dir_all(&git_dir.join(dir))?;
        }

        let head = format!("ref: {HEADS_PREFIX}{DEFAULT_BRANCH}\n");
        let config = Config::default_content();
        let defaults = [
            ("HEAD", head.as_str()),
            ("description", DEFAULT_DESCRIPTION),
            ("config", config.as_str()),
        ];
        for (name, content) in defaults {
            let file_path = git_dir.join(name);
            if fs::path_kind(&file_path)? == PathKind::Missing {
                fs::atomic_write(&file_path, content.as_bytes())?;
            }
        }
        tracing::info!(path = %git_dir.display(), "initialized repository");

        Self::open(path)
    }

    /// Open the repository whose working tree root is `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let path = root
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(root.as_ref(), e))?;
        let git_dir = path.join(METADATA_DIR);

        if fs::path_kind(&git_dir)? != PathKind::Directory {
            return Err(Error::NotFound(format!(
                "not a repository: {}",
                path.display()
            )));
        }

        let config = Config::load(git_dir.join("config"))?;
        config.validate()?;

        Ok(Repository {
            database: Database::new(git_dir.join("objects")),
            workspace: Workspace::new(&path),
            refs: Refs::new(&git_dir),
            config,
            git_dir,
            path,
        })
    }

    /// Walk from `start` up through its parents to the first working tree
    pub fn find_repository_root(start: impl AsRef<Path>) -> Result<Option<Self>> {
        let start = start
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(start.as_ref(), e))?;

        for dir in start.ancestors() {
            if fs::path_kind(&dir.join(METADATA_DIR))? == PathKind::Directory {
                tracing::debug!(root = %dir.display(), "found repository");
                return Self::open(dir).map(Some);
            }
        }

        Ok(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn index_path(&self) -> PathBuf {
        self.git_dir.join("index")
    }

    pub fn write_object(&self, object: &Object) -> Result<ObjectId> {
        self.database.write(object)
    }

    pub fn read_object(&self, oid: &ObjectId, expected: Option<ObjectType>) -> Result<Object> {
        match expected {
            Some(expected) => self.database.read_typed(oid, expected),
            None => self.database.read(oid),
        }
    }

    pub fn read_commit(&self, oid: &ObjectId) -> Result<Commit> {
        match self.database.read_typed(oid, ObjectType::Commit)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(Error::WrongType {
                oid: oid.clone(),
                expected: ObjectType::Commit,
                actual: other.object_type(),
            }),
        }
    }

    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree> {
        match self.database.read_typed(oid, ObjectType::Tree)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(Error::WrongType {
                oid: oid.clone(),
                expected: ObjectType::Tree,
                actual: other.object_type(),
            }),
        }
    }

    pub fn read_index(&self) -> Result<Index> {
        Index::load(self.index_path())
    }

    pub fn write_index(&self, index: &Index) -> Result<()> {
        index.store()
    }

    pub fn resolve_object_name(
        &self,
        name: &str,
        expected: Option<ObjectType>,
    ) -> Result<ResolvedRevision> {
        Revision::parse(name)?.resolve(self, expected)
    }

    pub fn get_active_branch(&self) -> Result<ActiveBranch> {
        self.refs.get_active_branch()
    }

    pub fn write_ref(&self, reference: &Reference) -> Result<()> {
        self.refs.write_ref(reference)
    }

    pub fn write_head(&self, value: RefValue) -> Result<()> {
        self.refs.write_head(value)
    }

    pub fn get_all_refs(&self) -> Result<BTreeMap<String, ObjectId>> {
        self.refs.get_all_refs()
    }

    pub fn is_ignored(&self, path: &str) -> Result<bool> {
        self.is_ignored_with(&self.read_index()?, path)
    }

    /// Whether `path` (a repository path) is excluded from staging
    ///
    /// The metadata directory is always ignored. A path is also ignored when
    /// any directory above it is. For each candidate, `.gitignore` files
    /// staged in `index` are consulted from its own directory upwards, and
    /// `info/exclude` last.
    pub fn is_ignored_with(&self, index: &Index, path: &str) -> Result<bool> {
        if path.split('/').any(|component| component == METADATA_DIR) {
            return Ok(true);
        }
        if path.is_empty() {
            return Ok(false);
        }

        let ignore_files = index
            .entries()
            .filter(|entry| entry.basename() == IGNORE_FILE_NAME)
            .map(|entry| {
                let dir = entry.parent_dirs().last().copied().unwrap_or_default();
                (dir.to_string(), entry.oid.clone())
            })
            .collect::<BTreeMap<_, _>>();
        let exclude = match fs::read_if_exists(&self.git_dir.join("info").join("exclude"))? {
            Some(content) => IgnoreRules::parse(&content),
            None => IgnoreRules::default(),
        };

        let is_dir = fs::path_kind(&self.path.join(path))? == PathKind::Directory;
        let mut candidates = path
            .match_indices('/')
            .map(|(at, _)| (&path[..at], true))
            .collect::<Vec<_>>();
        candidates.push((path, is_dir));

        for (candidate, is_dir) in candidates {
            if self.is_excluded(&ignore_files, &exclude, candidate, is_dir)? {
                tracing::debug!(path, candidate, "path ignored");
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn is_excluded(
        &self,
        ignore_files: &BTreeMap<String, ObjectId>,
        exclude: &IgnoreRules,
        path: &str,
        is_dir: bool,
    ) -> Result<bool> {
        let mut dirs = path
            .match_indices('/')
            .map(|(at, _)| &path[..at])
            .collect::<Vec<_>>();
        dirs.insert(0, "");

        for dir in dirs.into_iter().rev() {
            let Some(oid) = ignore_files.get(dir) else {
                continue;
            };
            let relative = if dir.is_empty() {
                path
            } else {
                &path[dir.len() + 1..]
            };

            if self.load_ignore_rules(oid)?.is_ignored(relative, is_dir)? {
                return Ok(true);
            }
        }

        exclude.is_ignored(path, is_dir)
    }

    fn load_ignore_rules(&self, oid: &ObjectId) -> Result<IgnoreRules> {
        match self.database.read_typed(oid, ObjectType::Blob)? {
            Object::Blob(blob) => Ok(IgnoreRules::parse(blob.content())),
            _ => Ok(IgnoreRules::default()),
        }
    }

    /// Stage one file, loading and storing the index around it
    pub fn stage_path(&self, path: &str) -> Result<StageOutcome> {
        let mut index = self.read_index()?;
        let outcome = self.stage_into(&mut index, path)?;
        if outcome != StageOutcome::Unchanged {
            index.store()?;
        }

        Ok(outcome)
    }

    /// Stage one file into an already loaded index
    ///
    /// A tracked path that no longer exists is dropped from the index.
    /// Ignored paths are rejected. A file whose stat data is not newer than
    /// its entry is reported unchanged without being read.
    pub fn stage_into(&self, index: &mut Index, path: &str) -> Result<StageOutcome> {
        let path = Workspace::to_repo_path(Path::new(path))?;
        if !self.workspace.exists(&path) && index.is_directly_tracked(&path) {
            index.remove(&path);
            tracing::debug!(path = %path, "removed deleted path from index");
            return Ok(StageOutcome::Removed);
        }
        if self.is_ignored_with(index, &path)? {
            return Err(Error::InvalidPath(format!("{path} is ignored")));
        }

        let stat = self.workspace.stat_file(&path)?;
        if stat.mode.is_tree() {
            return Err(Error::IsDirectory(self.path.join(&path)));
        }
        if index.is_fresh(&path, &stat) {
            tracing::trace!(path = %path, "index entry is fresh, skipping hash");
            return Ok(StageOutcome::Unchanged);
        }

        let data = self.workspace.read_file(&path)?;
        let oid = self.database.write(&Object::Blob(Blob::new(data)))?;
        let outcome = index.stage(IndexEntry::new(path.clone(), oid, stat));
        tracing::debug!(path = %path, ?outcome, "staged file");

        Ok(outcome)
    }

    /// Write the tree objects for `node` and its subdirectories
    pub fn write_tree(&self, node: &IndexTreeNode) -> Result<ObjectId> {
        let mut entries = Vec::with_capacity(node.children.len());

        for (name, child) in &node.children {
            let entry = match &child.entry {
                Some(index_entry) => TreeEntry::new(
                    index_entry.metadata.mode,
                    index_entry.oid.clone(),
                    name.clone(),
                ),
                None => TreeEntry::new(EntryMode::Directory, self.write_tree(child)?, name.clone()),
            };
            entries.push(entry);
        }

        self.database.write(&Object::Tree(Tree::new(entries)))
    }

    /// Record the index as a new commit on top of HEAD
    ///
    /// HEAD (or the branch it names) only moves once the commit is stored.
    pub fn commit(&self, message: &str, author: &Author) -> Result<ObjectId> {
        let index = self.read_index()?;
        let tree_oid = self.write_tree(&index.to_tree())?;

        let parent = match self.refs.read_head() {
            Ok(oid) => Some(oid),
            Err(Error::NoCommits) => None,
            Err(e) => return Err(e),
        };

        let commit = Commit::new(tree_oid, parent, author, message.to_string());
        let oid = self.database.write(&Object::Commit(commit))?;
        self.refs.update_head(oid.clone())?;
        tracing::info!(oid = %oid, "created commit");

        Ok(oid)
    }

    /// Create `refs/tags/<name>`, pointing at a tag object when annotated
    pub fn create_tag(
        &self,
        name: &str,
        target: &str,
        annotation: Option<TagAnnotation>,
    ) -> Result<ObjectId> {
        let tag_ref = format!("{TAGS_PREFIX}{name}");
        if self.refs.resolve(&tag_ref)?.is_some() {
            return Err(Error::InvalidName(format!("tag '{name}' already exists")));
        }

        let target_oid = self.resolve_object_name(target, None)?.oid;
        // validates the name before anything is written
        let mut reference = Reference::tag(name, target_oid.clone())?;

        if let Some(TagAnnotation { tagger, message }) = annotation {
            let target_type = self.database.object_type(&target_oid)?;
            let tag = Tag::new(target_oid, target_type, name, &tagger.display(), message);
            reference.value = RefValue::Direct(self.database.write(&Object::Tag(tag))?);
        }

        self.refs.write_ref(&reference)?;
        match &reference.value {
            RefValue::Direct(oid) => Ok(oid.clone()),
            RefValue::Symbolic(_) => Err(Error::corrupt("tag reference must be direct")),
        }
    }

    /// Every file below tree `oid`, keyed by repository path
    pub fn flatten_tree(&self, oid: &ObjectId) -> Result<HeadTree> {
        let mut files = HeadTree::new();
        self.collect_tree(oid, "", &mut files)?;
        Ok(files)
    }

    fn collect_tree(&self, oid: &ObjectId, prefix: &str, files: &mut HeadTree) -> Result<()> {
        for entry in self.read_tree(oid)?.into_entries() {
            let path = if prefix.is_empty() {
                entry.name
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if entry.mode.is_tree() {
                self.collect_tree(&entry.oid, &path, files)?;
            } else {
                files.insert(path, HeadEntry::new(entry.mode, entry.oid));
            }
        }

        Ok(())
    }

    pub fn status(&self) -> Result<StatusReport> {
        let index = self.read_index()?;
        Status::new(self).collect(&index)
    }
}
