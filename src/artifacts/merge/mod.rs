//! Merging
//!
//! - `common_ancestor`: merge base search over the commit graph
//! - `resolve`: three-way classification of every path and conflict content

pub mod common_ancestor;
pub mod resolve;
