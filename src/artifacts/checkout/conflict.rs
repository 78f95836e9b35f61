use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Snapshot;
use std::path::{Path, PathBuf};

/// Untracked working files a working-directory update would clobber
///
/// For every path the update writes, three layouts put untracked data at risk:
///
/// - an untracked file sits at the path itself
/// - a directory sits at the path, holding files `tracked` does not know
/// - an untracked file sits where one of the path's parent directories must go
///
/// The result lists the endangered files, sorted and without duplicates.
pub fn untracked_overwrites<'p>(
    workspace: &Workspace,
    tracked: &Snapshot,
    incoming: impl IntoIterator<Item = &'p Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut conflicts = Vec::new();

    for path in incoming {
        if workspace.is_dir(path) {
            conflicts.extend(
                workspace
                    .list_files_under(path)?
                    .into_iter()
                    .filter(|file| !tracked.contains_key(file)),
            );
        } else if workspace.exists(path) && !tracked.contains_key(path) {
            conflicts.push(path.to_path_buf());
        }

        conflicts.extend(
            path.ancestors()
                .skip(1)
                .take_while(|ancestor| !ancestor.as_os_str().is_empty())
                .filter(|ancestor| workspace.exists(ancestor) && !tracked.contains_key(*ancestor))
                .map(Path::to_path_buf),
        );
    }

    conflicts.sort();
    conflicts.dedup();
    Ok(conflicts)
}
