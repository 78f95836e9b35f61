//! Three-way merge resolution
//!
//! Each path tracked by the merge base, the current head or the other head is
//! classified by comparing the blob each side records for it (`None` when a side
//! does not track the path):
//!
//! | current vs other | current vs base | other vs base | outcome          |
//! |------------------|-----------------|---------------|------------------|
//! | equal            |                 |               | keep current     |
//! |                  | equal           |               | take other       |
//! |                  |                 | equal         | keep current     |
//! | otherwise        |                 |               | conflict         |
//!
//! "Take other" on a path the other side deleted removes it. Conflicts combine
//! both versions into one file between `<<<<<<< HEAD`, `=======` and `>>>>>>>`
//! markers; an absent side contributes nothing.

use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// What the merge does to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Write and stage the other side's blob
    TakeOther(ObjectId),
    /// Delete the working file and stage its removal
    Remove,
    /// Both sides changed the path in different ways
    Conflict {
        current: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

/// Every path the merge changes, in path order; untouched paths are absent
pub type MergePlan = BTreeMap<PathBuf, Resolution>;

/// Classify one path from the blobs the three commits record for it
pub fn resolve_path(
    base: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> Option<Resolution> {
    if current == other || other == base {
        return None;
    }

    if current == base {
        return Some(match other {
            Some(oid) => Resolution::TakeOther(oid.clone()),
            None => Resolution::Remove,
        });
    }

    Some(Resolution::Conflict {
        current: current.cloned(),
        other: other.cloned(),
    })
}

pub fn plan_merge(base: &Snapshot, current: &Snapshot, other: &Snapshot) -> MergePlan {
    let paths = base
        .keys()
        .chain(current.keys())
        .chain(other.keys())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .filter_map(|path| {
            resolve_path(base.get(path), current.get(path), other.get(path))
                .map(|resolution| (path.clone(), resolution))
        })
        .collect()
}

/// Paths the merge writes into the working directory
pub fn written_paths(plan: &MergePlan) -> Vec<&Path> {
    plan.iter()
        .filter(|(_, resolution)| {
            matches!(
                resolution,
                Resolution::TakeOther(_) | Resolution::Conflict { .. }
            )
        })
        .map(|(path, _)| path.as_path())
        .collect()
}

/// Whole-file conflict representation of two versions
pub fn conflict_content(current: Option<&[u8]>, other: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    let mut content = Vec::with_capacity(current.len() + other.len() + 32);
    content.extend_from_slice(b"<<<<<<< HEAD\n");
    content.extend_from_slice(current);
    content.extend_from_slice(b"=======\n");
    content.extend_from_slice(other);
    content.extend_from_slice(b">>>>>>>\n");

    content.into()
}
