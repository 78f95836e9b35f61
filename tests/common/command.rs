use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const DEFAULT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `1.txt` and `a/2.txt` committed on `main`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));

    run_gitlet_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    run_gitlet_command(repository_dir.path(), &["add", "a/2.txt"])
        .assert()
        .success();

    gitlet_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.env("NO_PAGER", "1");
    cmd.env("GITLET_DATE", DEFAULT_DATE);
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", message])
}

pub fn gitlet_commit_at(dir: &Path, message: &str, date: &str) -> Command {
    let mut cmd = gitlet_commit(dir, message);
    cmd.env("GITLET_DATE", date);
    cmd
}

/// Write `content` to `path`, then stage and commit it
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));
    run_gitlet_command(dir, &["add", path]).assert().success();
    gitlet_commit(dir, message).assert().success();
}

fn read_state(dir: &Path) -> serde_json::Value {
    let state = std::fs::read_to_string(dir.join(".gitlet").join("state"))
        .expect("Failed to read repository state");
    serde_json::from_str(&state).expect("Repository state is not valid JSON")
}

pub fn current_branch(dir: &Path) -> String {
    read_state(dir)["refs"]["current"]
        .as_str()
        .expect("No current branch")
        .to_string()
}

pub fn branch_head(dir: &Path, branch: &str) -> Option<String> {
    read_state(dir)["refs"]["branches"][branch]
        .as_str()
        .map(str::to_string)
}

pub fn head_commit_id(dir: &Path) -> String {
    branch_head(dir, &current_branch(dir)).expect("Current branch has no head")
}

/// Commit IDs in `log` order, newest first
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    let output = run_gitlet_command(dir, &["log"])
        .output()
        .expect("Failed to run log");

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
