//! Commit object
//!
//! Commits are immutable snapshots of the tracked files. They contain:
//! - Parent commit ID(s): none for the root commit, two for merge commits
//! - A timestamp with its UTC offset
//! - The snapshot itself, a sorted map of path to blob ID
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! timestamp <unix-seconds> <+hhmm>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! Because the snapshot is sorted, two commits with the same message, timestamp,
//! snapshot and parents always serialize, and therefore hash, identically.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, wrap_envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GitletError, GitletResult};
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::collections::BTreeMap;
use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};

/// Tracked path → blob ID
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

/// Message of the root commit every repository starts from
pub const ROOT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the commit timestamp
pub const DATE_ENV: &str = "GITLET_DATE";

const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Load the timestamp for a new commit
///
/// Reads `GITLET_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`), falling back to the
/// local clock.
pub fn load_timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
    match std::env::var(DATE_ENV) {
        Ok(date_str) => DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .with_context(|| format!("{DATE_ENV} is not a valid date: {date_str}")),
        Err(_) => Ok(chrono::Local::now().fixed_offset()),
    }
}

/// Slim representation of a commit
///
/// Only what the graph algorithms need: the commit's ID and its parents.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for the root commit, two entries for merge commits
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    snapshot: Snapshot,
    message: String,
}

impl Commit {
    /// The synthetic root commit
    ///
    /// Fixed message, the Unix epoch and an empty snapshot, so its ID is the same in
    /// every repository.
    pub fn root() -> Self {
        let epoch = DateTime::from_timestamp(0, 0)
            .unwrap_or_default()
            .fixed_offset();

        Commit {
            parents: Vec::new(),
            timestamp: epoch,
            snapshot: Snapshot::new(),
            message: ROOT_MESSAGE.to_string(),
        }
    }

    /// Create a new commit on top of `parent`
    ///
    /// Fails with `EmptyMessage` on a blank message and, for ordinary (non-merge)
    /// commits, with `NothingToCommit` if `snapshot` equals the parent's snapshot.
    pub fn create(
        message: &str,
        timestamp: DateTime<FixedOffset>,
        snapshot: Snapshot,
        parent: (&ObjectId, &Commit),
        merge_parent: Option<ObjectId>,
    ) -> GitletResult<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(GitletError::EmptyMessage);
        }

        let (parent_oid, parent_commit) = parent;
        if merge_parent.is_none() && parent_commit.snapshot == snapshot {
            return Err(GitletError::NothingToCommit);
        }

        let parents = std::iter::once(parent_oid.clone())
            .chain(merge_parent)
            .collect();

        Ok(Commit {
            parents,
            // only whole seconds are serialized
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            snapshot,
            message: message.to_string(),
        })
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, followed by `log`
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Blob tracked for `path` in this commit, if any
    pub fn tracked(&self, path: &Path) -> Option<&ObjectId> {
        self.snapshot.get(path)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp like `Thu Nov 9 20:00:05 2017 -0800`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
        }
    }

    fn content_lines(&self) -> Vec<String> {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.snapshot {
            lines.push(format!("file {} {}", oid.as_ref(), path.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines
    }
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, offset) = value
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: timestamp is not a number")?;

    let (sign, digits) = match offset.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid commit object: malformed offset {offset}"),
    };
    if digits.len() != 4 {
        anyhow::bail!("Invalid commit object: malformed offset {offset}");
    }
    let hours = digits[..2].parse::<i32>()?;
    let minutes = digits[2..].parse::<i32>()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .context("Invalid commit object: offset out of range")?;

    Ok(DateTime::from_timestamp(seconds, 0)
        .context("Invalid commit object: timestamp out of range")?
        .with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = self.content_lines().join("\n");
        wrap_envelope(self.object_type(), content.as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.split('\n');

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut snapshot = Snapshot::new();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(parse_timestamp(value)?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (oid, path) = entry
                    .split_once(' ')
                    .context("Invalid commit object: malformed file line")?;
                snapshot.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp line")?;
        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit {
            parents,
            timestamp,
            snapshot,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.content_lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    fn oid(content: &str) -> ObjectId {
        ObjectId::digest(content.as_bytes())
    }

    fn at(seconds: i64) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2023-01-01T12:00:00-08:00").unwrap()
            + chrono::Duration::seconds(seconds)
    }

    #[fixture]
    fn root() -> (ObjectId, Commit) {
        let root = Commit::root();
        (root.object_id().unwrap(), root)
    }

    fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, content)| (PathBuf::from(path), oid(content)))
            .collect()
    }

    #[test]
    fn root_commit_has_a_fixed_id() {
        let first = Commit::root().object_id().unwrap();
        let second = Commit::root().object_id().unwrap();

        assert_eq!(first, second);
        assert!(Commit::root().parent().is_none());
        assert_eq!(Commit::root().message(), ROOT_MESSAGE);
    }

    #[rstest]
    fn identical_commits_share_an_id(root: (ObjectId, Commit)) {
        let (root_oid, root_commit) = root;
        let files = snapshot(&[("a.txt", "A"), ("b.txt", "B")]);

        let first =
            Commit::create("add files", at(0), files.clone(), (&root_oid, &root_commit), None)
                .unwrap();
        let second =
            Commit::create("add files", at(0), files, (&root_oid, &root_commit), None).unwrap();

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[rstest]
    fn any_field_change_changes_the_id(root: (ObjectId, Commit)) {
        let (root_oid, root_commit) = root;
        let files = snapshot(&[("a.txt", "A")]);
        let base = Commit::create("msg", at(0), files.clone(), (&root_oid, &root_commit), None)
            .unwrap()
            .object_id()
            .unwrap();

        let other_message =
            Commit::create("msg2", at(0), files.clone(), (&root_oid, &root_commit), None).unwrap();
        let other_time =
            Commit::create("msg", at(1), files.clone(), (&root_oid, &root_commit), None).unwrap();
        let other_snapshot = Commit::create(
            "msg",
            at(0),
            snapshot(&[("a.txt", "changed")]),
            (&root_oid, &root_commit),
            None,
        )
        .unwrap();
        let other_parent = Commit::create(
            "msg",
            at(0),
            files.clone(),
            (&oid("elsewhere"), &root_commit),
            None,
        )
        .unwrap();
        let merge = Commit::create(
            "msg",
            at(0),
            files,
            (&root_oid, &root_commit),
            Some(oid("second parent")),
        )
        .unwrap();

        for changed in [other_message, other_time, other_snapshot, other_parent, merge] {
            assert_ne!(changed.object_id().unwrap(), base);
        }
    }

    #[rstest]
    fn rejects_blank_messages(root: (ObjectId, Commit)) {
        let (root_oid, root_commit) = root;
        let result = Commit::create(
            "  ",
            at(0),
            snapshot(&[("a.txt", "A")]),
            (&root_oid, &root_commit),
            None,
        );

        assert!(matches!(result, Err(GitletError::EmptyMessage)));
    }

    #[rstest]
    fn rejects_unchanged_snapshots_unless_merging(root: (ObjectId, Commit)) {
        let (root_oid, root_commit) = root;

        let ordinary =
            Commit::create("same", at(0), Snapshot::new(), (&root_oid, &root_commit), None);
        assert!(matches!(ordinary, Err(GitletError::NothingToCommit)));

        let merge = Commit::create(
            "Merged topic into main.",
            at(0),
            Snapshot::new(),
            (&root_oid, &root_commit),
            Some(oid("topic head")),
        )
        .unwrap();
        assert!(merge.is_merge());
        assert_eq!(merge.merge_parent(), Some(&oid("topic head")));
    }

    #[rstest]
    fn survives_serialization(root: (ObjectId, Commit)) {
        let (root_oid, root_commit) = root;
        let commit = Commit::create(
            "multi\nline message",
            at(42),
            snapshot(&[("dir/with space.txt", "x"), ("z.txt", "z")]),
            (&root_oid, &root_commit),
            Some(oid("other")),
        )
        .unwrap();

        let mut reader = Cursor::new(commit.serialize().unwrap().to_vec());
        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Commit
        );
        let parsed = Commit::deserialize(reader).unwrap();

        assert_eq!(parsed, commit);
        assert_eq!(parsed.object_id().unwrap(), commit.object_id().unwrap());
    }

    #[test]
    fn formats_readable_timestamps() {
        let commit = Commit::root();
        assert_eq!(commit.readable_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
    }
}
