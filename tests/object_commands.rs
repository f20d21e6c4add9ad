use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use common::command::{init_repository_dir, kit_stdout, repository_dir, run_kit_command};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const HELLO_BLOB: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[rstest]
fn hash_object_without_repository_only_hashes(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    repository_dir.child("hello.txt").write_str("hello\n")?;

    run_kit_command(repository_dir.path(), &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{HELLO_BLOB}\n"));

    assert!(!repository_dir.path().join(".git").exists());

    Ok(())
}

#[rstest]
fn hash_object_writes_and_cat_file_reads_back(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("hello.txt").write_str("hello\n")?;

    run_kit_command(repository_dir.path(), &["hash-object", "-w", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{HELLO_BLOB}\n"));

    let object_path = repository_dir
        .path()
        .join(".git/objects")
        .join(&HELLO_BLOB[..2])
        .join(&HELLO_BLOB[2..]);
    assert!(object_path.is_file());

    assert_eq!(kit_stdout(repository_dir.path(), &["cat-file", "-p", HELLO_BLOB]), "hello");
    assert_eq!(kit_stdout(repository_dir.path(), &["cat-file", "-t", "ce0136"]), "blob");
    assert_eq!(kit_stdout(repository_dir.path(), &["cat-file", "-s", HELLO_BLOB]), "6");
    assert_eq!(
        kit_stdout(repository_dir.path(), &["cat-file", "blob", HELLO_BLOB]),
        "hello"
    );

    Ok(())
}

#[rstest]
fn hash_object_rejects_malformed_tree_body(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    repository_dir.child("tree.bin").write_str("100644 no-terminator")?;

    run_kit_command(repository_dir.path(), &["hash-object", "-t", "tree", "tree.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));

    Ok(())
}

#[rstest]
fn cat_file_of_missing_object_fails(init_repository_dir: TempDir) {
    run_kit_command(
        init_repository_dir.path(),
        &["cat-file", "-p", "0123456789abcdef0123456789abcdef01234567"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("not found"));
}

#[rstest]
fn ls_tree_lists_top_level_entries(init_repository_dir: TempDir) {
    let output = kit_stdout(init_repository_dir.path(), &["ls-tree", "HEAD"]);
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("100644 blob "));
    assert!(lines[0].ends_with("\t1.txt"));
    assert!(lines[1].starts_with("040000 tree "));
    assert!(lines[1].ends_with("\ta"));
}

#[rstest]
fn ls_tree_recursive_lists_every_file(init_repository_dir: TempDir) {
    let output = kit_stdout(init_repository_dir.path(), &["ls-tree", "-r", "HEAD"]);
    let paths = output
        .lines()
        .filter_map(|line| line.split_once('\t').map(|(_, path)| path))
        .collect::<Vec<_>>();

    assert_eq!(paths, vec!["1.txt", "a/2.txt", "a/b/3.txt"]);
}

#[rstest]
fn cat_file_pretty_prints_a_commit(init_repository_dir: TempDir) {
    let output = kit_stdout(init_repository_dir.path(), &["cat-file", "-p", "HEAD"]);

    assert!(output.starts_with("tree "));
    assert!(output.contains("\nauthor fake_user <fake_email@email.com> 1672574400 +0000\n"));
    assert!(output.ends_with("\n\nInitial commit"));
}
