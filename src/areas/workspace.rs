use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".gitlet", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    /// Every file in the working directory, relative to its root, in path order
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.list_files_under(Path::new(""))
    }

    /// Every file below the directory `dir`, relative to the working directory root
    pub fn list_files_under(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(self.path.join(dir))
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()));

        for entry in walker {
            let entry = entry.with_context(|| {
                format!("Unable to list working directory {}", self.path.display())
            })?;

            if entry.file_type().is_file()
                && let Ok(relative) = entry.path().strip_prefix(&self.path)
            {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// `path` relative to the working directory root, with `.` and `..` resolved
    ///
    /// Returns `None` for paths that leave the working directory or point into the
    /// repository directory.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let path = path.strip_prefix(&self.path).unwrap_or(path);

        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => relative.push(name),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        match relative.components().next() {
            Some(first) if Self::is_ignored(Path::new(first.as_os_str())) => None,
            _ => Some(relative),
        }
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or_default()
    }

    /// Whether `file_path` is a regular file in the working directory
    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, dir_path: &Path) -> bool {
        self.path.join(dir_path).is_dir()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            self.make_directory(parent)?;
        }
        if full_path.is_dir() {
            // only an emptied directory may give way to a file
            std::fs::remove_dir(&full_path).with_context(|| {
                format!("Refusing to replace non-empty directory: {:?}", file_path)
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file, pruning directories it leaves empty
    ///
    /// Deleting a file that is already gone is not an error.
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(file_path)
    }

    fn prune_empty_parent_dirs(&self, file_path: &Path) -> anyhow::Result<()> {
        for ancestor in file_path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }

            let dir_path = self.path.join(ancestor);
            let is_empty = match std::fs::read_dir(&dir_path) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => break,
            };
            if !is_empty {
                break;
            }

            std::fs::remove_dir(&dir_path)
                .with_context(|| format!("Failed to remove directory: {:?}", ancestor))?;
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        for ancestor in dir_path.ancestors() {
            if ancestor == self.path.as_ref() {
                break;
            }
            if ancestor.is_file() {
                anyhow::bail!("Refusing to replace file {:?} with a directory", ancestor);
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))
    }

    // Deletions run before writes so that a path can change from a file into a
    // directory (or back) within one migration.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            self.remove_file(file_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions_of(action) {
                let oid = oid
                    .as_ref()
                    .with_context(|| format!("No blob planned for {}", file_path.display()))?;
                let data = migration.load_blob_data(oid)?;

                self.write_file(file_path, &data)?;
            }
        }

        Ok(())
    }
}
