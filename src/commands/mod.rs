//! Command implementations
//!
//! Every user-facing operation lives in `porcelain`, one module per command, each
//! extending [`Repository`](crate::areas::repository::Repository) with its method.

pub mod porcelain;
