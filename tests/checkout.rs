use assert_fs::TempDir;
use common::command::{
    branch_head, commit_file, current_branch, head_commit_id, init_repository_dir,
    run_gitlet_command,
};
use common::file::{FileSpec, read_file, snapshot_workspace, write_file};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

mod common;

/// `main` and `feature` diverged after `Initial commit`
///
/// - `main`: `1.txt` rewritten, `main.txt` added
/// - `feature`: `a/2.txt` removed, `feature/f.txt` added
#[fixture]
fn repository_with_branches(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"]).assert().success();

    write_file(FileSpec::new(dir.join("1.txt"), "one, main".to_string()));
    run_gitlet_command(dir, &["add", "1.txt"]).assert().success();
    commit_file(dir, "main.txt", "main", "Main work");

    run_gitlet_command(dir, &["checkout", "feature"]).assert().success();
    run_gitlet_command(dir, &["rm", "a/2.txt"]).assert().success();
    commit_file(dir, "feature/f.txt", "feature", "Feature work");
    run_gitlet_command(dir, &["checkout", "main"]).assert().success();

    init_repository_dir
}

#[rstest]
fn switching_branches_and_back_restores_the_working_directory(
    repository_with_branches: TempDir,
) {
    let dir = repository_with_branches.path();
    let on_main = snapshot_workspace(dir);

    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .success()
        .stdout("Switched to branch 'feature'\n");

    assert_eq!(current_branch(dir), "feature");
    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert!(!dir.join("a").join("2.txt").exists());
    assert!(!dir.join("main.txt").exists());
    assert_eq!(read_file(&dir.join("feature").join("f.txt")), "feature");

    run_gitlet_command(dir, &["checkout", "main"]).assert().success();

    assert_eq!(snapshot_workspace(dir), on_main);
}

#[rstest]
fn untracked_files_in_the_way_abort_the_switch(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    write_file(FileSpec::new(
        dir.join("feature").join("f.txt"),
        "precious".to_string(),
    ));
    let before = snapshot_workspace(dir);
    let head = head_commit_id(dir);

    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .code(1)
        .stderr(
            "There is an untracked file in the way; delete it, or add and commit it first.\n",
        );

    assert_eq!(snapshot_workspace(dir), before);
    assert_eq!(current_branch(dir), "main");
    assert_eq!(head_commit_id(dir), head);
}

#[rstest]
#[case::checkout(&["checkout", "feature"])]
#[case::merge(&["merge", "feature"])]
fn an_untracked_file_where_a_directory_goes_is_kept(
    repository_with_branches: TempDir,
    #[case] args: &[&str],
) {
    let dir = repository_with_branches.path();
    write_file(FileSpec::new(dir.join("feature"), "precious".to_string()));
    let before = snapshot_workspace(dir);
    let head = head_commit_id(dir);

    run_gitlet_command(dir, args)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("untracked file in the way"));

    assert_eq!(snapshot_workspace(dir), before);
    assert_eq!(head_commit_id(dir), head);
}

#[rstest]
fn an_untracked_directory_where_a_file_goes_is_kept(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    run_gitlet_command(dir, &["checkout", "feature"]).assert().success();
    let feature_head = head_commit_id(dir);
    write_file(FileSpec::new(
        dir.join("main.txt").join("keep.txt"),
        "precious".to_string(),
    ));

    run_gitlet_command(dir, &["checkout", "main"])
        .assert()
        .failure()
        .code(1);
    let main_head = branch_head(dir, "main").unwrap();
    run_gitlet_command(dir, &["reset", &main_head])
        .assert()
        .failure()
        .code(1);

    assert_eq!(current_branch(dir), "feature");
    assert_eq!(head_commit_id(dir), feature_head);
    assert_eq!(read_file(&dir.join("main.txt").join("keep.txt")), "precious");
}

#[rstest]
fn checkout_rejects_unknown_and_current_branches(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();

    run_gitlet_command(dir, &["checkout", "nowhere"])
        .assert()
        .failure()
        .stderr("No such branch exists.\n");
    run_gitlet_command(dir, &["checkout", "main"])
        .assert()
        .failure()
        .stderr("No need to checkout the current branch.\n");
}

#[rstest]
fn checkout_file_restores_head_or_a_given_commit(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    let initial = common::command::log_commit_ids(dir)[1].clone();
    write_file(FileSpec::new(dir.join("1.txt"), "scribbles".to_string()));

    run_gitlet_command(dir, &["checkout", "--", "1.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("1.txt")), "one, main");

    run_gitlet_command(dir, &["checkout", &initial[..8], "--", "1.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("1.txt")), "one");

    run_gitlet_command(dir, &["checkout", "0000000000", "--", "1.txt"])
        .assert()
        .failure()
        .stderr("No commit with that id exists.\n");
    run_gitlet_command(dir, &["checkout", &initial, "--", "main.txt"])
        .assert()
        .failure()
        .stderr("File does not exist in that commit.\n");
}

#[rstest]
fn reset_moves_the_branch_to_an_older_commit(repository_with_branches: TempDir) {
    let dir = repository_with_branches.path();
    let initial = common::command::log_commit_ids(dir)[1].clone();
    write_file(FileSpec::new(dir.join("staged.txt"), "s".to_string()));
    run_gitlet_command(dir, &["add", "staged.txt"]).assert().success();

    run_gitlet_command(dir, &["reset", &initial]).assert().success();

    assert_eq!(head_commit_id(dir), initial);
    assert!(!dir.join("main.txt").exists());
    assert_eq!(read_file(&dir.join("1.txt")), "one");
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"))
        .stdout(predicate::str::contains("=== Untracked Files ===\nstaged.txt\n"));
}
