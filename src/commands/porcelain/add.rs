use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::{GitletError, GitletResult};
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Stage the working copy of `path` for the next commit
    ///
    /// Adding a file whose content matches the head commit unstages it instead, and
    /// either way any pending removal of the path is cancelled.
    pub fn add(&mut self, path: &Path) -> GitletResult<()> {
        let path = self.snapshot_path(path)?;
        if !self.workspace().exists(&path) {
            return Err(GitletError::FileNotFound(path));
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let (_, head) = self.head_commit()?;

        let mut state = self.state().clone();
        if head.tracked(&path) == Some(&blob_id) {
            debug!(path = %path.display(), "content matches head, unstaging");
            state.index.unstage(&path);
        } else {
            self.database().store(&blob)?;
            debug!(path = %path.display(), blob = %blob_id, "staged");
            state.index.stage(path, blob_id);
        }

        self.commit_state(state)
    }
}
