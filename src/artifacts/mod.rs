//! Version control data structures and algorithms
//!
//! - `branch`: Branch names and their validation
//! - `checkout`: Moving the working directory between snapshots
//! - `core`: Shared utilities (pager wrapper)
//! - `log`: Commit history traversal and log formatting
//! - `merge`: Merge base search and three-way resolution
//! - `objects`: Object types (blob, commit) and their identifiers
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
