use crate::areas::repository::Repository;
use crate::errors::{GitletError, GitletResult};
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Unstage `path`, and if the head commit tracks it, stage its removal and
    /// delete the working copy
    pub fn remove(&mut self, path: &Path) -> GitletResult<()> {
        let path = self.snapshot_path(path)?;
        let (_, head) = self.head_commit()?;

        let mut state = self.state().clone();
        let tracked = head.tracked(&path).is_some();

        if tracked {
            state.index.mark_removal(path.clone(), true)?;
        } else if state.index.staged(&path).is_some() {
            state.index.unstage(&path);
        } else {
            return Err(GitletError::NothingToRemove);
        }

        self.commit_state(state)?;

        if tracked {
            debug!(path = %path.display(), "staged for removal");
            self.workspace().remove_file(&path)?;
        }

        Ok(())
    }
}
