//! Stored object types
//!
//! Everything the repository persists in its object database is an object identified
//! by the SHA-1 hash of its serialized form. There are two kinds:
//!
//! - **Blob**: raw file content
//! - **Commit**: a snapshot (path → blob) with its message, timestamp and parents
//!
//! Both serialize to the same envelope: `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest prefix accepted when a user abbreviates an object ID
pub const MIN_ABBREV_LENGTH: usize = 4;
