//! Staging index
//!
//! The index records what the next commit will change relative to the head commit:
//!
//! - `additions`: paths mapped to the blob they will point to
//! - `removals`: paths that will stop being tracked
//!
//! A path is never in both sets at once; whichever operation ran last wins.
//! The index never writes objects itself: blobs are stored by the caller before
//! they are staged.

use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Paths staged for addition or modification
    additions: BTreeMap<PathBuf, ObjectId>,
    /// Paths staged for removal
    removals: BTreeSet<PathBuf>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `path` to point at `oid`, dropping any pending removal
    pub fn stage(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
    }

    /// Forget anything staged for `path`
    pub fn unstage(&mut self, path: &Path) {
        self.additions.remove(path);
        self.removals.remove(path);
    }

    /// Stage `path` for removal, dropping any pending addition
    ///
    /// Fails with `NothingToRemove` if the path is neither staged nor tracked by
    /// the head commit.
    pub fn mark_removal(&mut self, path: PathBuf, tracked_in_head: bool) -> GitletResult<()> {
        if !tracked_in_head && !self.additions.contains_key(&path) {
            return Err(GitletError::NothingToRemove);
        }

        self.additions.remove(&path);
        self.removals.insert(path);

        Ok(())
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Blob staged for `path`, if any
    pub fn staged(&self, path: &Path) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    /// The snapshot the next commit records
    ///
    /// `head` overlaid with the staged additions, minus the staged removals.
    pub fn apply_to(&self, head: &Snapshot) -> Snapshot {
        let mut snapshot = head.clone();

        for (path, oid) in &self.additions {
            snapshot.insert(path.clone(), oid.clone());
        }
        for path in &self.removals {
            snapshot.remove(path);
        }

        snapshot
    }
}
