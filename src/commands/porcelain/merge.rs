use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::untracked_overwrites;
use crate::artifacts::merge::common_ancestor::CommonAncestorFinder;
use crate::artifacts::merge::resolve::{Resolution, conflict_content, plan_merge, written_paths};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merge commit now at the head of the current branch
    pub commit: ObjectId,
    /// Paths left with conflict markers, in path order
    pub conflicts: Vec<PathBuf>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

impl Repository {
    /// Merge the branch `name` into the current branch
    ///
    /// Always records a merge commit whose parents are the current head and the
    /// other branch's head. Conflicting paths are committed with both versions
    /// between conflict markers.
    pub fn merge(
        &mut self,
        name: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> GitletResult<MergeOutcome> {
        if !self.state().index.is_empty() {
            return Err(GitletError::UncommittedChanges);
        }
        let (other_branch, other_oid) = self.lookup_branch(name)?;
        if self.state().refs.is_current_branch(&other_branch) {
            return Err(GitletError::SelfMerge);
        }

        let (head_oid, head) = self.head_commit()?;
        let other = self.database().parse_object_as_commit(&other_oid)?;

        let base_oid = {
            let database = self.database();
            let finder = CommonAncestorFinder::new(|oid: &ObjectId| {
                Ok(database.parse_object_as_commit(oid)?.to_slim(oid.clone()))
            });
            finder.find_lowest_common_ancestor(&head_oid, &other_oid)?
        };
        let base = self.database().parse_object_as_commit(&base_oid)?;
        debug!(base = %base_oid, head = %head_oid, other = %other_oid, "found merge base");

        let plan = plan_merge(base.snapshot(), head.snapshot(), other.snapshot());

        let in_the_way =
            untracked_overwrites(self.workspace(), head.snapshot(), written_paths(&plan))?;
        if !in_the_way.is_empty() {
            return Err(GitletError::UntrackedFileConflict(in_the_way));
        }

        let mut snapshot = head.snapshot().clone();
        let mut writes = Vec::<(PathBuf, Bytes)>::new();
        let mut removals = Vec::<PathBuf>::new();
        let mut conflicts = Vec::<PathBuf>::new();

        for (path, resolution) in &plan {
            match resolution {
                Resolution::TakeOther(oid) => {
                    let blob = self.database().parse_object_as_blob(oid)?;
                    writes.push((path.clone(), blob.into_content()));
                    snapshot.insert(path.clone(), oid.clone());
                }
                Resolution::Remove => {
                    removals.push(path.clone());
                    snapshot.remove(path);
                }
                Resolution::Conflict { current, other } => {
                    let current = self.load_blob_content(current.as_ref())?;
                    let other = self.load_blob_content(other.as_ref())?;

                    let blob = Blob::new(conflict_content(current.as_deref(), other.as_deref()));
                    let oid = self.database().store(&blob)?;

                    writes.push((path.clone(), blob.into_content()));
                    snapshot.insert(path.clone(), oid);
                    conflicts.push(path.clone());
                }
            }
        }

        let message = format!(
            "Merged {} into {}.",
            other_branch,
            self.state().refs.current_branch()
        );
        let commit_oid =
            self.write_commit(&message, timestamp, snapshot, (&head_oid, &head), Some(other_oid))?;

        for path in &removals {
            self.workspace().remove_file(path)?;
        }
        for (path, content) in &writes {
            self.workspace().write_file(path, content)?;
        }

        info!(
            commit = %commit_oid,
            conflicts = conflicts.len(),
            "merged {}", other_branch
        );
        if !conflicts.is_empty() {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(MergeOutcome {
            commit: commit_oid,
            conflicts,
        })
    }

    fn load_blob_content(&self, oid: Option<&ObjectId>) -> GitletResult<Option<Bytes>> {
        match oid {
            Some(oid) => Ok(Some(self.database().parse_object_as_blob(oid)?.into_content())),
            None => Ok(None),
        }
    }
}
