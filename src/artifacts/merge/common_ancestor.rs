//! Lowest common ancestor search for merges
//!
//! The merge base of two commits is found with a breadth-first walk over every
//! parent edge (both parents of merge commits), started from both commits at once:
//!
//! 1. Each commit reached records its distance from the source side, the target
//!    side, or both. The frontier is a FIFO queue, so commits are visited in
//!    generation order and the recorded distances are the shortest ones.
//! 2. Commits reached from both sides are common ancestors. A common ancestor that
//!    is itself an ancestor of another common ancestor is STALE and dropped.
//! 3. Of the remaining candidates the one met earliest wins (smallest distance to
//!    the farther side). Ties go to the candidate with the larger combined
//!    distance, then to the smaller digest, so the answer never depends on hash map
//!    iteration order.
//!
//! Commits are loaded through a caller-supplied function, so the search works the
//! same over the object database and over in-memory graphs in tests.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::debug;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b000;
        const FROM_SOURCE = 0b001;
        const FROM_TARGET = 0b010;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
        const STALE = 0b100;
    }
}

impl Default for VisitState {
    fn default() -> Self {
        VisitState::NONE
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Visit {
    state: VisitState,
    from_source: usize,
    from_target: usize,
}

impl Visit {
    /// Generation in which both walks reached this commit
    fn meeting_generation(&self) -> usize {
        self.from_source.max(self.from_target)
    }

    fn combined_distance(&self) -> usize {
        self.from_source + self.from_target
    }
}

pub struct CommonAncestorFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> CommonAncestorFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    /// `commit_loader` returns a commit's parents, failing if it is missing
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// The split point of `source` and `target`
    ///
    /// `source` itself when both are the same commit, and the older commit when one
    /// is an ancestor of the other. Fails with `NoCommonAncestor` when the histories
    /// never meet, which only happens in a malformed graph.
    pub fn find_lowest_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> GitletResult<ObjectId> {
        if source == target {
            return Ok(source.clone());
        }

        let mut parents_cache = HashMap::<ObjectId, Vec<ObjectId>>::new();
        let mut visits = self.walk_both_sides(source, target, &mut parents_cache)?;

        let common_ancestors = visits
            .iter()
            .filter(|(_, visit)| visit.state.contains(VisitState::FROM_BOTH))
            .map(|(oid, _)| oid.clone())
            .collect::<Vec<_>>();

        if common_ancestors.is_empty() {
            return Err(GitletError::NoCommonAncestor(
                source.to_string(),
                target.to_string(),
            ));
        }
        debug!(count = common_ancestors.len(), "found common ancestors");

        self.mark_stale_ancestors(&common_ancestors, &mut visits, &mut parents_cache)?;

        let best = visits
            .iter()
            .filter(|(_, visit)| visit.state == VisitState::FROM_BOTH)
            .min_by(|(left_oid, left), (right_oid, right)| {
                left.meeting_generation()
                    .cmp(&right.meeting_generation())
                    .then_with(|| right.combined_distance().cmp(&left.combined_distance()))
                    .then_with(|| left_oid.cmp(right_oid))
            })
            .map(|(oid, _)| oid.clone());

        match best {
            Some(oid) => {
                debug!(%source, %target, base = %oid, "selected merge base");
                Ok(oid)
            }
            None => Err(GitletError::NoCommonAncestor(
                source.to_string(),
                target.to_string(),
            )),
        }
    }

    /// Walk the ancestry of both commits in generation order
    fn walk_both_sides(
        &self,
        source: &ObjectId,
        target: &ObjectId,
        parents_cache: &mut HashMap<ObjectId, Vec<ObjectId>>,
    ) -> anyhow::Result<HashMap<ObjectId, Visit>> {
        let mut visits = HashMap::<ObjectId, Visit>::new();
        let mut frontier = VecDeque::from([
            (source.clone(), VisitState::FROM_SOURCE, 0),
            (target.clone(), VisitState::FROM_TARGET, 0),
        ]);

        while let Some((oid, side, distance)) = frontier.pop_front() {
            let visit = visits.entry(oid.clone()).or_default();
            if visit.state.contains(side) {
                continue;
            }

            visit.state |= side;
            if side == VisitState::FROM_SOURCE {
                visit.from_source = distance;
            } else {
                visit.from_target = distance;
            }

            for parent in self.parents_of(&oid, parents_cache)? {
                frontier.push_back((parent, side, distance + 1));
            }
        }

        Ok(visits)
    }

    /// Flag every ancestor of a common ancestor as STALE
    fn mark_stale_ancestors(
        &self,
        common_ancestors: &[ObjectId],
        visits: &mut HashMap<ObjectId, Visit>,
        parents_cache: &mut HashMap<ObjectId, Vec<ObjectId>>,
    ) -> anyhow::Result<()> {
        let mut queue = VecDeque::new();
        for oid in common_ancestors {
            queue.extend(self.parents_of(oid, parents_cache)?);
        }

        while let Some(oid) = queue.pop_front() {
            let visit = visits.entry(oid.clone()).or_default();
            if visit.state.contains(VisitState::STALE) {
                continue;
            }

            visit.state |= VisitState::STALE;
            queue.extend(self.parents_of(&oid, parents_cache)?);
        }

        debug!(
            stale = visits
                .values()
                .filter(|visit| visit.state.contains(VisitState::STALE))
                .count(),
            "dropped redundant common ancestors"
        );

        Ok(())
    }

    fn parents_of(
        &self,
        oid: &ObjectId,
        parents_cache: &mut HashMap<ObjectId, Vec<ObjectId>>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        if let Some(parents) = parents_cache.get(oid) {
            return Ok(parents.clone());
        }

        let SlimCommit { parents, .. } = (self.commit_loader)(oid)?;
        parents_cache.insert(oid.clone(), parents.clone());

        Ok(parents)
    }
}
