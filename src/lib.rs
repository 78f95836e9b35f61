//! gitlet, a small local version-control system
//!
//! The crate is organised the same way the on-disk repository is:
//!
//! - `areas`: the stateful parts of a repository (object database, staging index,
//!   branch table, working directory) and the `Repository` session tying them together
//! - `artifacts`: the data structures and algorithms operating on those areas
//!   (objects, history traversal, merge-base search, checkout planning, status)
//! - `commands`: the user-facing operations, implemented on `Repository`
//! - `errors`: the error taxonomy surfaced to callers

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

pub use errors::{ErrorKind, GitletError, GitletResult};
