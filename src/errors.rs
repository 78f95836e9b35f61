//! Error taxonomy
//!
//! Every repository operation returns [`GitletResult`]. The `Display` form of each
//! variant is the message shown to the user; [`GitletError::kind`] tells the caller
//! whether the failure was bad input, a refused overwrite, or a broken store.

use std::path::PathBuf;
use thiserror::Error;

pub type GitletResult<T> = Result<T, GitletError>;

/// Broad classification of a [`GitletError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable; the operation aborted without touching any state
    UserInput,
    /// An untracked working file would have been overwritten; nothing was touched
    SafetyViolation,
    /// The object store or state record is missing data or is corrupt
    StorageIntegrity,
}

#[derive(Debug, Error)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("Path is outside the repository: {}", .0.display())]
    OutsideRepository(PathBuf),

    #[error("Unsupported file name: {0:?}")]
    UnsupportedPath(PathBuf),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("No commit with that id exists.")]
    UnknownCommit(String),

    #[error("No such branch exists.")]
    UnknownBranch(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrent,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("Found no commit with that message.")]
    NoMatchingCommit,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<PathBuf>),

    #[error("No common ancestor between {0} and {1}")]
    NoCommonAncestor(String, String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Storage(#[from] anyhow::Error),
}

impl GitletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitletError::UntrackedFileConflict(_) => ErrorKind::SafetyViolation,
            GitletError::NoCommonAncestor(..) | GitletError::Io(_) | GitletError::Storage(_) => {
                ErrorKind::StorageIntegrity
            }
            _ => ErrorKind::UserInput,
        }
    }
}
