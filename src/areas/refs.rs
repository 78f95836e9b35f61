//! Branch table
//!
//! Maps branch names to the commit they point at and remembers which branch is
//! checked out. The head commit is always the value of the current branch, so there
//! is no detached-head state.
//!
//! The table lives inside the repository state record and is persisted with it.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    /// Branch that `HEAD` follows
    current: BranchName,
    branches: BTreeMap<BranchName, ObjectId>,
}

impl Refs {
    /// A table holding only the default branch, pointing at `root`
    pub fn new(root: ObjectId) -> Self {
        let current = BranchName::default_branch();
        let branches = BTreeMap::from([(current.clone(), root)]);

        Refs { current, branches }
    }

    pub fn create(&mut self, name: BranchName, at: ObjectId) -> GitletResult<()> {
        if self.branches.contains_key(&name) {
            return Err(GitletError::BranchExists(name.to_string()));
        }

        self.branches.insert(name, at);
        Ok(())
    }

    /// Delete a branch pointer, returning the commit it pointed at
    pub fn remove(&mut self, name: &BranchName) -> GitletResult<ObjectId> {
        if !self.branches.contains_key(name) {
            return Err(GitletError::UnknownBranch(name.to_string()));
        }
        if name == &self.current {
            return Err(GitletError::CannotRemoveCurrent);
        }

        self.branches
            .remove(name)
            .ok_or_else(|| GitletError::UnknownBranch(name.to_string()))
    }

    pub fn set_head(&mut self, name: &BranchName, oid: ObjectId) -> GitletResult<()> {
        let head = self
            .branches
            .get_mut(name)
            .ok_or_else(|| GitletError::UnknownBranch(name.to_string()))?;
        *head = oid;

        Ok(())
    }

    pub fn read(&self, name: &BranchName) -> GitletResult<&ObjectId> {
        self.branches
            .get(name)
            .ok_or_else(|| GitletError::UnknownBranch(name.to_string()))
    }

    pub fn current_head(&self) -> GitletResult<&ObjectId> {
        self.read(&self.current)
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.current
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        name == &self.current
    }

    pub fn switch_to(&mut self, name: &BranchName) -> GitletResult<()> {
        if !self.branches.contains_key(name) {
            return Err(GitletError::UnknownBranch(name.to_string()));
        }

        self.current = name.clone();
        Ok(())
    }

    /// Branches in name order
    pub fn branches(&self) -> &BTreeMap<BranchName, ObjectId> {
        &self.branches
    }
}
