//! Repository state record
//!
//! The staging index and the branch table are persisted together as a single JSON
//! document at `.gitlet/state`:
//!
//! ```json
//! { "refs": { "current": "main", "branches": { "main": "<oid>" } },
//!   "index": { "additions": { "path": "<oid>" }, "removals": ["path"] } }
//! ```
//!
//! Writes go to a temporary file that is renamed over the record, so a reader sees
//! either the old state or the new one.

use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use fake::rand;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub refs: Refs,
    pub index: Index,
}

impl RepositoryState {
    /// State of a freshly initialized repository
    pub fn new(root: ObjectId) -> Self {
        RepositoryState {
            refs: Refs::new(root),
            index: Index::new(),
        }
    }

    pub fn rehydrate(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read(path)
            .with_context(|| format!("Unable to read repository state {}", path.display()))?;

        serde_json::from_slice(&content)
            .with_context(|| format!("Corrupt repository state {}", path.display()))
    }

    pub fn write_updates(&self, path: &Path) -> anyhow::Result<()> {
        let content =
            serde_json::to_vec_pretty(self).context("Unable to serialize repository state")?;

        let state_dir = path
            .parent()
            .with_context(|| format!("Invalid state path {}", path.display()))?;
        let temp_path = state_dir.join(format!("state-{}.tmp", rand::random::<u32>()));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open state file {}", temp_path.display()))?;
        file.write_all(&content)
            .with_context(|| format!("Unable to write state file {}", temp_path.display()))?;
        file.sync_all()?;

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Unable to replace repository state {}", path.display()))?;
        debug!(path = %path.display(), "persisted repository state");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::branch::branch_name::BranchName;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn survives_a_write_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state");

        let mut state = RepositoryState::new(ObjectId::digest(b"root"));
        state
            .refs
            .create(
                BranchName::try_parse("topic".into()).unwrap(),
                ObjectId::digest(b"tip"),
            )
            .unwrap();
        state
            .index
            .stage(PathBuf::from("dir/a.txt"), ObjectId::digest(b"a"));
        state
            .index
            .mark_removal(PathBuf::from("b.txt"), true)
            .unwrap();

        state.write_updates(&path).unwrap();
        assert_eq!(RepositoryState::rehydrate(&path).unwrap(), state);

        // no temp files are left behind
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn uses_the_documented_layout() {
        let state = RepositoryState::new(ObjectId::digest(b"root"));
        let json: serde_json::Value = serde_json::to_value(&state).unwrap();

        assert_eq!(json["refs"]["current"], "main");
        assert_eq!(
            json["refs"]["branches"]["main"],
            ObjectId::digest(b"root").as_ref()
        );
        assert!(json["index"]["additions"].as_object().unwrap().is_empty());
        assert!(json["index"]["removals"].as_array().unwrap().is_empty());
    }

    #[test]
    fn rejects_corrupt_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(RepositoryState::rehydrate(&path).is_err());
    }
}
