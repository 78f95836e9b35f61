//! Working-directory updates
//!
//! Moving the working directory from one commit's snapshot to another's, and
//! detecting untracked files that such a move would overwrite. Conflicts are
//! detected before any file is changed.

pub mod conflict;
pub mod migration;
