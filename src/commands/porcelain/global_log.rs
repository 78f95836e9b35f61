use crate::areas::repository::Repository;
use crate::artifacts::log::LogEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitletResult;
use std::io::Write;

impl Repository {
    /// Show every commit ever made, in object ID order
    pub fn global_log(&self) -> GitletResult<Vec<LogEntry>> {
        let entries = self
            .all_commit_ids()?
            .into_iter()
            .map(|oid| {
                let commit = self.database().parse_object_as_commit(&oid)?;
                Ok(LogEntry::new(oid, commit))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        for entry in &entries {
            write!(self.writer(), "{entry}")?;
        }

        Ok(entries)
    }

    /// IDs of every commit in the object store, blobs skipped
    pub(crate) fn all_commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut commit_ids = Vec::new();

        for oid in self.database().list_objects()? {
            if self.database().get_object_type(&oid)? == ObjectType::Commit {
                commit_ids.push(oid);
            }
        }

        Ok(commit_ids)
    }
}
