use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, GitletResult};
use std::io::Write;

impl Repository {
    /// IDs of every commit whose message is exactly `message`
    ///
    /// Commit messages are stored trimmed, so the query is trimmed the same way.
    /// Fails with `NoMatchingCommit` when there are none.
    pub fn find(&self, message: &str) -> GitletResult<Vec<ObjectId>> {
        let message = message.trim();
        let mut matches = Vec::new();

        for oid in self.all_commit_ids()? {
            let commit = self.database().parse_object_as_commit(&oid)?;
            if commit.message() == message {
                matches.push(oid);
            }
        }

        if matches.is_empty() {
            return Err(GitletError::NoMatchingCommit);
        }
        for oid in &matches {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::porcelain::test_support::{at, init, write};
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::path::Path;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[rstest]
    fn finds_every_commit_with_the_exact_message(dir: TempDir) {
        let (mut repository, output) = init(&dir);
        write(&dir, "a.txt", "1");
        repository.add(Path::new("a.txt")).unwrap();
        let first = repository.commit("tweak", at(1)).unwrap();
        write(&dir, "a.txt", "2");
        repository.add(Path::new("a.txt")).unwrap();
        let second = repository.commit("tweak", at(2)).unwrap();
        write(&dir, "a.txt", "3");
        repository.add(Path::new("a.txt")).unwrap();
        repository.commit("tweak again", at(3)).unwrap();
        output.clear();

        let mut found = repository.find("tweak").unwrap();
        found.sort();
        let mut expected = vec![first, second];
        expected.sort();

        assert_eq!(found, expected);
        assert_eq!(output.contents().lines().count(), 2);
    }

    #[rstest]
    fn surrounding_whitespace_matches_like_it_was_committed(dir: TempDir) {
        let (mut repository, _) = init(&dir);
        write(&dir, "a.txt", "1");
        repository.add(Path::new("a.txt")).unwrap();
        let oid = repository.commit("msg ", at(1)).unwrap();

        assert_eq!(repository.find("msg ").unwrap(), vec![oid.clone()]);
        assert_eq!(repository.find("msg").unwrap(), vec![oid]);
    }

    #[rstest]
    fn no_match_is_an_error(dir: TempDir) {
        let (repository, _) = init(&dir);

        assert!(matches!(
            repository.find("nothing like this"),
            Err(GitletError::NoMatchingCommit)
        ));
        assert_eq!(repository.find("initial commit").unwrap().len(), 1);
    }
}
