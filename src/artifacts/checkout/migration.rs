//! Working-directory migration between two snapshots
//!
//! Checking out a branch and resetting to a commit both move the working directory
//! from the snapshot of the head commit to the snapshot of a target commit:
//!
//! 1. Compare the two snapshots
//! 2. Refuse if an untracked file sits where a target file would be written
//! 3. Delete files tracked only by the source snapshot
//! 4. Write every file of the target snapshot
//!
//! ## Safety
//!
//! All actions are planned before anything is touched, so a conflict aborts the
//! migration with the working directory unchanged.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::untracked_overwrites;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Type of file system action required for a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create a file the source snapshot does not track
    Add,
    /// Delete a file the target snapshot does not track
    Delete,
    /// Rewrite a file both snapshots track
    Modify,
}

/// Planned actions grouped by type
pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database, workspace: &'r Workspace) -> Self {
        let actions = BTreeMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            database,
            workspace,
            actions,
        }
    }

    pub fn actions_of(&self, action: ActionType) -> &[(PathBuf, Option<ObjectId>)] {
        self.actions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Plan and run the migration from `from` to `to`
    pub fn apply_changes(&mut self, from: &Snapshot, to: &Snapshot) -> GitletResult<()> {
        self.plan_changes(from, to)?;
        self.workspace.apply_migration(self)?;

        Ok(())
    }

    pub fn plan_changes(&mut self, from: &Snapshot, to: &Snapshot) -> GitletResult<()> {
        let conflicts =
            untracked_overwrites(self.workspace, from, to.keys().map(PathBuf::as_path))?;
        if !conflicts.is_empty() {
            return Err(GitletError::UntrackedFileConflict(conflicts));
        }

        for path in from.keys().filter(|path| !to.contains_key(*path)) {
            self.record_change(ActionType::Delete, path.clone(), None);
        }
        for (path, oid) in to {
            let action = if from.contains_key(path) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            self.record_change(action, path.clone(), Some(oid.clone()));
        }

        debug!(
            added = self.actions_of(ActionType::Add).len(),
            deleted = self.actions_of(ActionType::Delete).len(),
            modified = self.actions_of(ActionType::Modify).len(),
            "planned migration"
        );

        Ok(())
    }

    fn record_change(&mut self, action: ActionType, path: PathBuf, oid: Option<ObjectId>) {
        self.actions.entry(action).or_default().push((path, oid));
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .database
            .parse_object_as_blob(object_id)
            .with_context(|| format!("Failed to parse blob object {}", object_id))?;

        Ok(blob.into_content())
    }
}
