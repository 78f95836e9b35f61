//! Commit history
//!
//! - `rev_list`: lazy walks over the ancestry of a commit
//! - `LogEntry`: one commit as `log`, `global-log` and `find` report it
//!
//! ## Format
//!
//! ```text
//! ===
//! commit <digest>
//! Merge: <p1 short> <p2 short>
//! Date: Thu Nov 9 20:00:05 2017 -0800
//! <message>
//!
//! ```
//!
//! The `Merge:` line only appears for merge commits.

pub mod rev_list;

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use derive_new::new;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "{}", format!("commit {}", self.oid).yellow())?;

        if let [first, second, ..] = self.commit.parents() {
            writeln!(
                f,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }

        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Snapshot;
    use crate::artifacts::objects::object::Object;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_ordinary_and_merge_commits() {
        colored::control::set_override(false);

        let root = Commit::root();
        let root_oid = root.object_id().unwrap();
        assert_eq!(
            LogEntry::new(root_oid.clone(), root.clone()).to_string(),
            format!("===\ncommit {root_oid}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n")
        );

        let other = ObjectId::digest(b"other head");
        let merge = Commit::create(
            "Merged topic into main.",
            DateTime::parse_from_rfc3339("2017-11-09T20:00:05-08:00").unwrap(),
            Snapshot::new(),
            (&root_oid, &root),
            Some(other.clone()),
        )
        .unwrap();
        let merge_oid = merge.object_id().unwrap();

        assert_eq!(
            LogEntry::new(merge_oid.clone(), merge).to_string(),
            format!(
                "===\ncommit {merge_oid}\nMerge: {} {}\nDate: Thu Nov 9 20:00:05 2017 -0800\nMerged topic into main.\n\n",
                root_oid.to_short_oid(),
                other.to_short_oid()
            )
        );
    }
}
