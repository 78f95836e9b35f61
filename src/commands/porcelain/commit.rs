use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Snapshot};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use chrono::{DateTime, FixedOffset};
use std::io::Write;
use tracing::info;

impl Repository {
    /// Record the staged snapshot as a new commit on the current branch
    pub fn commit(
        &mut self,
        message: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> GitletResult<ObjectId> {
        if message.trim().is_empty() {
            return Err(GitletError::EmptyMessage);
        }
        if self.state().index.is_empty() {
            return Err(GitletError::NothingToCommit);
        }

        let (head_oid, head) = self.head_commit()?;
        let snapshot = self.state().index.apply_to(head.snapshot());
        let commit_oid = self.write_commit(message, timestamp, snapshot, (&head_oid, &head), None)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.state().refs.current_branch(),
            commit_oid.to_short_oid(),
            message.trim().lines().next().unwrap_or_default()
        )?;

        Ok(commit_oid)
    }

    /// Store a commit on top of `parent`, advance the current branch to it and
    /// clear the staging area
    pub(crate) fn write_commit(
        &mut self,
        message: &str,
        timestamp: DateTime<FixedOffset>,
        snapshot: Snapshot,
        parent: (&ObjectId, &Commit),
        merge_parent: Option<ObjectId>,
    ) -> GitletResult<ObjectId> {
        let commit = Commit::create(message, timestamp, snapshot, parent, merge_parent)?;
        let commit_oid = self.database().store(&commit)?;

        let mut state = self.state().clone();
        let branch = state.refs.current_branch().clone();
        state.refs.set_head(&branch, commit_oid.clone())?;
        state.index.clear();
        self.commit_state(state)?;

        info!(branch = %branch, commit = %commit_oid, "created commit");

        Ok(commit_oid)
    }
}
