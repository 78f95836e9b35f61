//! Repository session
//!
//! A `Repository` is the only way to read or change a repository. Opening one takes
//! an exclusive advisory lock on `.gitlet/lock` that is held until the session is
//! dropped, and loads the state record into memory. Every mutating operation works
//! on a copy of that state and swaps it in only after the copy has been persisted.

use crate::areas::database::Database;
use crate::areas::state::RepositoryState;
use crate::areas::workspace::Workspace;
use crate::artifacts::log::rev_list::{RevList, Traversal};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GitletError, GitletResult};
use anyhow::Context;
use file_guard::{FileGuard, Lock};
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Repository directory inside the working directory
pub const GITLET_DIR: &str = ".gitlet";
pub(crate) const OBJECTS_DIR: &str = "objects";
pub(crate) const STATE_FILE: &str = "state";
const LOCK_FILE: &str = "lock";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    state: RepositoryState,
    _lock: FileGuard<Box<File>>,
}

impl Repository {
    /// Open the repository rooted at `path`
    ///
    /// Fails with `NotInitialized` when `path` has no `.gitlet` directory.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> GitletResult<Self> {
        let path = Self::canonical_root(path)?;
        if !path.join(GITLET_DIR).is_dir() {
            return Err(GitletError::NotInitialized);
        }

        let lock = Self::acquire_lock(&path)?;
        let state = RepositoryState::rehydrate(&path.join(GITLET_DIR).join(STATE_FILE))?;
        debug!(path = %path.display(), "opened repository");

        Ok(Self::assemble(path, writer, state, lock))
    }

    pub(crate) fn assemble(
        path: PathBuf,
        writer: Box<dyn std::io::Write>,
        state: RepositoryState,
        lock: FileGuard<Box<File>>,
    ) -> Self {
        let database = Database::new(path.join(GITLET_DIR).join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());

        Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            state,
            _lock: lock,
        }
    }

    pub(crate) fn canonical_root(path: &Path) -> GitletResult<PathBuf> {
        Ok(path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?)
    }

    pub(crate) fn acquire_lock(path: &Path) -> GitletResult<FileGuard<Box<File>>> {
        let lock_path = path.join(GITLET_DIR).join(LOCK_FILE);
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file at {:?}", lock_path))?;

        let guard = file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("failed to lock {:?}", lock_path))?;

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    /// Persist `state` and make it the session's state
    ///
    /// Nothing changes in memory if the write fails.
    pub(crate) fn commit_state(&mut self, state: RepositoryState) -> GitletResult<()> {
        state.write_updates(&self.path.join(GITLET_DIR).join(STATE_FILE))?;
        self.state = state;

        Ok(())
    }

    pub fn head_oid(&self) -> GitletResult<ObjectId> {
        Ok(self.state.refs.current_head()?.clone())
    }

    pub fn head_commit(&self) -> GitletResult<(ObjectId, Commit)> {
        let head_oid = self.head_oid()?;
        let commit = self.database.parse_object_as_commit(&head_oid)?;

        Ok((head_oid, commit))
    }

    /// Resolve a full or abbreviated commit ID
    ///
    /// Fails with `UnknownCommit` when the ID matches no commit or more than one
    /// object.
    pub fn resolve_commit(&self, id: &str) -> GitletResult<(ObjectId, Commit)> {
        let unknown = || GitletError::UnknownCommit(id.to_string());

        let oid = match ObjectId::try_parse(id.to_string()) {
            Ok(oid) if self.database.contains(&oid) => oid,
            Ok(_) => return Err(unknown()),
            Err(_) => match self.database.find_objects_by_prefix(id)?.as_slice() {
                [oid] => oid.clone(),
                _ => return Err(unknown()),
            },
        };

        if self.database.get_object_type(&oid)? != ObjectType::Commit {
            return Err(unknown());
        }
        let commit = self.database.parse_object_as_commit(&oid)?;

        Ok((oid, commit))
    }

    /// Normalize a user-supplied path into one a snapshot can record
    ///
    /// Snapshot paths must be valid UTF-8 without control characters, since commit
    /// objects store one path per line.
    pub(crate) fn snapshot_path(&self, path: &Path) -> GitletResult<PathBuf> {
        let relative = self
            .workspace
            .relative_path(path)
            .ok_or_else(|| GitletError::OutsideRepository(path.to_path_buf()))?;

        match relative.to_str() {
            Some(name) if !name.chars().any(char::is_control) => Ok(relative),
            _ => Err(GitletError::UnsupportedPath(relative)),
        }
    }

    /// Commits from `oid` back to the root along first parents
    pub fn first_parent_history(&self, oid: ObjectId) -> RevList<'_> {
        RevList::new(&self.database, oid, Traversal::FirstParent)
    }

    /// Every commit reachable from `oid`, across merge parents too
    pub fn ancestors_of(&self, oid: ObjectId) -> RevList<'_> {
        RevList::new(&self.database, oid, Traversal::AllParents)
    }
}
