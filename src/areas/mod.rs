//! Core repository components
//!
//! - `database`: Content-addressed object store for blobs and commits
//! - `index`: Staging area recording the changes for the next commit
//! - `refs`: Branch table and the current branch
//! - `state`: The persisted record holding the index and the branch table
//! - `repository`: The locked session that coordinates everything above
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod state;
pub(crate) mod workspace;
