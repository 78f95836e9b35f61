use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::errors::{GitletError, GitletResult};
use std::io::Write;
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Restore `path` to its content in the head commit; the index is untouched
    pub fn checkout_file(&mut self, path: &Path) -> GitletResult<()> {
        let (_, head) = self.head_commit()?;
        self.restore_file(&head, path)
    }

    /// Restore `path` to its content in the commit named by a full or abbreviated ID
    pub fn checkout_file_from_commit(&mut self, commit_id: &str, path: &Path) -> GitletResult<()> {
        let (_, commit) = self.resolve_commit(commit_id)?;
        self.restore_file(&commit, path)
    }

    /// Switch to `name`, moving the working directory to its head commit
    ///
    /// Fails with `UntrackedFileConflict`, leaving everything untouched, if that
    /// would overwrite an untracked file.
    pub fn checkout_branch(&mut self, name: &str) -> GitletResult<()> {
        let (branch_name, target_oid) = self.lookup_branch(name)?;
        if self.state().refs.is_current_branch(&branch_name) {
            return Err(GitletError::AlreadyOnBranch);
        }

        let (_, head) = self.head_commit()?;
        let target = self.database().parse_object_as_commit(&target_oid)?;
        Migration::new(self.database(), self.workspace())
            .apply_changes(head.snapshot(), target.snapshot())?;

        let mut state = self.state().clone();
        state.refs.switch_to(&branch_name)?;
        state.index.clear();
        self.commit_state(state)?;

        debug!(branch = name, head = %target_oid, "checked out branch");
        writeln!(self.writer(), "Switched to branch '{}'", branch_name)?;

        Ok(())
    }

    fn restore_file(&self, commit: &Commit, path: &Path) -> GitletResult<()> {
        let path = self.snapshot_path(path)?;
        let blob_oid = commit
            .tracked(&path)
            .ok_or_else(|| GitletError::FileNotInCommit(path.clone()))?;

        let blob = self.database().parse_object_as_blob(blob_oid)?;
        self.workspace().write_file(&path, blob.content())?;

        Ok(())
    }
}
