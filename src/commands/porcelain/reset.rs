use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::errors::GitletResult;
use tracing::debug;

impl Repository {
    /// Move the current branch to the commit named by `commit_id`, replacing the
    /// working directory with its snapshot and clearing the staging area
    pub fn reset(&mut self, commit_id: &str) -> GitletResult<()> {
        let (target_oid, target) = self.resolve_commit(commit_id)?;
        let (_, head) = self.head_commit()?;

        Migration::new(self.database(), self.workspace())
            .apply_changes(head.snapshot(), target.snapshot())?;

        let mut state = self.state().clone();
        let branch = state.refs.current_branch().clone();
        state.refs.set_head(&branch, target_oid.clone())?;
        state.index.clear();
        self.commit_state(state)?;

        debug!(branch = %branch, head = %target_oid, "reset branch");
        Ok(())
    }
}
