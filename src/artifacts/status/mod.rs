//! Working tree status inspection
//!
//! Compares the working directory against the staging index and the head commit.
//!
//! ## Components
//!
//! - `file_change`: how a working file differs from what is recorded
//! - `inspector`: hashing working files and comparing them to recorded blobs
//! - `status_info`: the status report and how it is displayed

pub mod file_change;
pub mod inspector;
pub mod status_info;
