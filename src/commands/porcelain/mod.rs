//! Porcelain commands (user-facing operations)
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository).
//! Mutating commands clone the session state, change the clone, and hand it to
//! `commit_state`, so a failure part way leaves the persisted state untouched.
//!
//! ## Commands
//!
//! - `init`: Create a repository
//! - `add` / `rm`: Stage files for addition or removal
//! - `commit`: Record the staged snapshot
//! - `log` / `global_log` / `find`: Inspect history
//! - `status`: Show branches, the staging area and the working directory
//! - `checkout` / `reset`: Restore files or move the working directory to a commit
//! - `branch`: Create and delete branches
//! - `merge`: Three-way merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod global_log;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
