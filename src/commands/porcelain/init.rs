use crate::areas::database::Database;
use crate::areas::repository::{GITLET_DIR, OBJECTS_DIR, Repository, STATE_FILE};
use crate::areas::state::RepositoryState;
use crate::artifacts::objects::commit::Commit;
use crate::errors::{GitletError, GitletResult};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Create a repository in `path` and open a session on it
    ///
    /// The new repository has a single branch, `main`, pointing at the root commit.
    pub fn init(path: &Path, writer: Box<dyn std::io::Write>) -> GitletResult<Self> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let path = Self::canonical_root(path)?;

        let gitlet_path = path.join(GITLET_DIR);
        if gitlet_path.exists() {
            return Err(GitletError::AlreadyInitialized);
        }

        fs::create_dir_all(gitlet_path.join(OBJECTS_DIR))
            .context("Failed to create .gitlet/objects directory")?;
        let lock = Self::acquire_lock(&path)?;

        let database = Database::new(gitlet_path.join(OBJECTS_DIR).into_boxed_path());
        let root_oid = database.store(&Commit::root())?;

        let state = RepositoryState::new(root_oid);
        state
            .write_updates(&gitlet_path.join(STATE_FILE))
            .context("Failed to write the initial repository state")?;
        debug!(path = %path.display(), root = %state.refs.current_head()?, "initialized repository");

        let repository = Self::assemble(path, writer, state, lock);
        writeln!(
            repository.writer(),
            "Initialized empty Gitlet repository in {}",
            gitlet_path.display()
        )?;

        Ok(repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::Object;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[rstest]
    fn init_starts_main_at_the_root_commit(dir: TempDir) {
        let repository = Repository::init(dir.path(), Box::new(std::io::sink())).unwrap();

        let (head_oid, head) = repository.head_commit().unwrap();
        assert_eq!(head, Commit::root());
        assert_eq!(head_oid, Commit::root().object_id().unwrap());
        assert_eq!(repository.state().refs.current_branch().as_ref(), "main");
        assert!(repository.state().index.is_empty());
        assert!(dir.path().join(GITLET_DIR).join(STATE_FILE).is_file());
        assert_eq!(repository.path(), dir.path().canonicalize().unwrap());
    }

    #[rstest]
    fn init_refuses_an_existing_repository(dir: TempDir) {
        drop(Repository::init(dir.path(), Box::new(std::io::sink())).unwrap());

        let result = Repository::init(dir.path(), Box::new(std::io::sink()));
        assert!(matches!(result, Err(GitletError::AlreadyInitialized)));
    }
}
