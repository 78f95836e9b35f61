use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use tracing::debug;

impl Repository {
    /// Create a branch pointing at the head commit, without switching to it
    pub fn branch(&mut self, name: &str) -> GitletResult<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;
        let head_oid = self.head_oid()?;

        let mut state = self.state().clone();
        state.refs.create(branch_name, head_oid.clone())?;
        self.commit_state(state)?;

        debug!(branch = name, at = %head_oid, "created branch");
        Ok(())
    }

    /// Delete a branch pointer; the commits it pointed at stay in the store
    pub fn remove_branch(&mut self, name: &str) -> GitletResult<()> {
        let (branch_name, _) = self.lookup_branch(name)?;

        let mut state = self.state().clone();
        let oid = state.refs.remove(&branch_name)?;
        self.commit_state(state)?;

        debug!(branch = name, was = %oid, "removed branch");
        Ok(())
    }

    /// An existing branch and the commit it points at
    ///
    /// Names that could never be valid branch names are reported as unknown too.
    pub(crate) fn lookup_branch(&self, name: &str) -> GitletResult<(BranchName, ObjectId)> {
        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| GitletError::UnknownBranch(name.to_string()))?;
        let oid = self.state().refs.read(&branch_name)?.clone();

        Ok((branch_name, oid))
    }
}
