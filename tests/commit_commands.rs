use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use common::command::{
    init_repository_dir, kit_commit, kit_stdout, repository_dir, run_kit_command,
};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const NO_PARENT: &str = "0000000000000000000000000000000000000000";

fn read_master(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".git/refs/heads/master"))
        .expect("Failed to read master")
        .trim()
        .to_string()
}

#[rstest]
fn first_commit_is_a_root_commit(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();
    dir.child("hello.txt").write_str("hello\n")?;
    run_kit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    kit_commit(dir.path(), "  Initial commit\n\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[master \(root-commit\) [0-9a-f]{7}\] Initial commit\n$",
        )?);

    let head = read_master(dir.path());
    let body = kit_stdout(dir.path(), &["cat-file", "commit", &head]);

    assert!(body.contains(&format!("\nparent {NO_PARENT}\n")));
    assert!(body.ends_with("\n\nInitial commit"));

    Ok(())
}

#[rstest]
fn second_commit_points_at_the_first(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let first = read_master(dir.path());

    dir.child("4.txt").write_str("four")?;
    run_kit_command(dir.path(), &["add", "4.txt"])
        .assert()
        .success();

    kit_commit(dir.path(), "Add four\n\nWith a longer body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Add four\n$")?);

    let second = read_master(dir.path());
    assert_ne!(first, second);

    let body = kit_stdout(dir.path(), &["cat-file", "-p", &second]);
    assert!(body.contains(&format!("\nparent {first}\n")));

    let files = kit_stdout(dir.path(), &["ls-tree", "-r", "HEAD"]);
    assert!(files.contains("\t4.txt\n"));

    Ok(())
}

#[rstest]
fn commit_on_detached_head_moves_head_only(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let first = read_master(dir.path());
    std::fs::write(dir.path().join(".git/HEAD"), format!("{first}\n"))?;

    kit_commit(dir.path(), "Detached work")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[detached HEAD "));

    let head = std::fs::read_to_string(dir.path().join(".git/HEAD"))?;
    assert_ne!(head.trim(), first);
    assert_eq!(read_master(dir.path()), first);

    Ok(())
}

#[rstest]
fn commit_without_author_fails(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["commit", "-m", "anonymous"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GIT_AUTHOR_NAME"));
}

#[rstest]
fn commit_with_blank_message_fails(init_repository_dir: TempDir) {
    kit_commit(init_repository_dir.path(), "   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty commit message"));
}
