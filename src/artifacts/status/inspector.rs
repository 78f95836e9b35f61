use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl<'r> Inspector<'r> {
    /// Blob ID the working file at `path` would be stored under
    pub fn workspace_blob_id(&self, path: &Path) -> anyhow::Result<ObjectId> {
        self.workspace.parse_blob(path)?.object_id()
    }

    /// Compare the working file at `path` against the blob `expected`
    pub fn check_against_workspace(
        &self,
        path: &Path,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.workspace.exists(path) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        if &self.workspace_blob_id(path)? != expected {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }
}
