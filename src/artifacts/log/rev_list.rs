use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Which parent edges a history walk follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Only the first parent of every commit, as `log` shows history
    FirstParent,
    /// Every parent, breadth-first by generation
    AllParents,
}

/// Lazy walk over the ancestry of a commit, the start commit included
///
/// Each commit is yielded once. A commit that cannot be loaded is yielded as an
/// error and ends the walk.
#[derive(Debug, Clone)]
pub struct RevList<'r> {
    database: &'r Database,
    traversal: Traversal,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, start: ObjectId, traversal: Traversal) -> Self {
        RevList {
            database,
            traversal,
            seen: HashSet::from([start.clone()]),
            queue: VecDeque::from([start]),
        }
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.queue.pop_front()?;

        match self.database.parse_object_as_commit(&commit_oid) {
            Ok(commit) => {
                let parents = match self.traversal {
                    Traversal::FirstParent => commit.parent().map(std::slice::from_ref).unwrap_or_default(),
                    Traversal::AllParents => commit.parents(),
                };

                for parent in parents {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent.clone());
                    }
                }

                Some(Ok((commit_oid, commit)))
            }
            Err(error) => {
                // If we can't parse the commit, end the iteration
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}
