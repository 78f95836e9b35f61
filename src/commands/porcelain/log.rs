use crate::areas::repository::Repository;
use crate::artifacts::log::LogEntry;
use crate::errors::GitletResult;
use std::io::Write;

impl Repository {
    /// Show the current branch's history, newest first, following first parents
    pub fn log(&self) -> GitletResult<Vec<LogEntry>> {
        let head_oid = self.head_oid()?;

        let entries = self
            .first_parent_history(head_oid)
            .map(|item| item.map(|(oid, commit)| LogEntry::new(oid, commit)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        for entry in &entries {
            write!(self.writer(), "{entry}")?;
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::porcelain::test_support::{at, commit_file, init};
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[rstest]
    fn log_walks_first_parents_back_to_the_root(dir: TempDir) {
        let (mut repository, output) = init(&dir);
        commit_file(&mut repository, &dir, "a.txt", "a", 1);
        commit_file(&mut repository, &dir, "b.txt", "b", 2);
        output.clear();

        let entries = repository.log().unwrap();

        let messages = entries
            .iter()
            .map(|entry| entry.commit.message())
            .collect::<Vec<_>>();
        assert_eq!(messages, vec!["write b.txt", "write a.txt", "initial commit"]);
        assert_eq!(entries[0].commit.timestamp(), at(2));

        let rendered = output.contents();
        assert_eq!(rendered.matches("===\n").count(), 3);
        assert!(rendered.starts_with(&format!("===\ncommit {}\n", entries[0].oid)));
        assert!(rendered.ends_with("initial commit\n\n"));
    }
}
