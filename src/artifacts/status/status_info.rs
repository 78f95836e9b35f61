use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use colored::Colorize;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

/// Snapshot of the repository's status, every section in path order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusInfo {
    pub branches: Vec<BranchName>,
    pub current_branch: BranchName,
    pub staged_files: FileSet,
    pub removed_files: FileSet,
    pub workspace_changeset: ChangeSet,
    pub untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self) -> anyhow::Result<StatusInfo> {
        let state = self.repository.state();
        let (_, head) = self.repository.head_commit()?;
        let inspector = Inspector::new(self.repository.workspace());

        let workspace_files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .collect::<FileSet>();

        let workspace_changeset =
            self.detect_workspace_changes(head.snapshot(), &state.index, &inspector)?;
        let untracked_files =
            Self::collect_untracked_files(workspace_files, head.snapshot(), &state.index);

        Ok(StatusInfo {
            branches: state.refs.branches().keys().cloned().collect(),
            current_branch: state.refs.current_branch().clone(),
            staged_files: state.index.additions().keys().cloned().collect(),
            removed_files: state.index.removals().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    // A file is changed but not staged when:
    // - it is tracked by head, neither staged nor marked for removal, and differs
    //   from head or is gone
    // - it is staged and differs from the staged blob or is gone
    fn detect_workspace_changes(
        &self,
        head: &Snapshot,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<ChangeSet> {
        let mut changes = ChangeSet::new();

        for (path, oid) in head {
            if index.staged(path).is_some() || index.is_staged_for_removal(path) {
                continue;
            }
            if let Some(change) = inspector.check_against_workspace(path, oid)? {
                changes.insert(path.clone(), change);
            }
        }

        for (path, oid) in index.additions() {
            if let Some(change) = inspector.check_against_workspace(path, oid)? {
                changes.insert(path.clone(), change);
            }
        }

        Ok(changes)
    }

    // Untracked: neither staged nor tracked by head, or marked for removal but
    // present again
    fn collect_untracked_files(workspace_files: FileSet, head: &Snapshot, index: &Index) -> FileSet {
        workspace_files
            .into_iter()
            .filter(|path| {
                index.staged(path).is_none()
                    && (!head.contains_key(path) || index.is_staged_for_removal(path))
            })
            .collect()
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{}", branch).green())?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            writeln!(f, "{} {}", path.display(), change)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display().to_string().red())?;
        }
        writeln!(f)
    }
}
