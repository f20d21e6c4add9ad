use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use common::command::{init_repository_dir, kit_stdout, repository_dir, run_kit_command};
use common::file::{delete_path, write_generated_files};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

mod common;

#[fixture]
fn empty_repository_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

#[rstest]
fn add_single_file_to_index_successfully(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child("hello.txt").write_str("hello\n")?;

    run_kit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "hello.txt");

    let index = std::fs::read(dir.path().join(".git/index"))?;
    // header, ten stat words, hex digest, u16 length, path
    assert_eq!(index.len(), 8 + 40 + 40 + 2 + "hello.txt".len());
    assert_eq!(&index[4..8], &[0, 0, 0, 1]);

    Ok(())
}

#[rstest]
fn add_files_from_nested_directories_in_path_order(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child("z.txt").write_str("z")?;
    dir.child("a/b/c.txt").write_str("c")?;
    dir.child("a/a.txt").write_str("a")?;
    dir.child("a-b.txt").write_str("ab")?;

    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    assert_eq!(
        kit_stdout(dir.path(), &["ls-files"]),
        "a-b.txt\na/a.txt\na/b/c.txt\nz.txt"
    );

    Ok(())
}

#[rstest]
fn add_generated_files_lists_them_all(empty_repository_dir: TempDir) {
    let dir = empty_repository_dir;
    let files = write_generated_files(dir.path(), 5);

    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let mut expected = files
        .iter()
        .map(|spec| spec.path.file_name().unwrap().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    expected.sort();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), expected.join("\n"));
}

#[rstest]
fn add_resolves_paths_from_a_subdirectory(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child("src/main.rs").write_str("fn main() {}\n")?;
    dir.child("src/lib.rs").write_str("")?;

    run_kit_command(&dir.path().join("src"), &["add", "main.rs"])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "src/main.rs");

    Ok(())
}

#[rstest]
fn adding_a_non_existent_file_fails(empty_repository_dir: TempDir) {
    run_kit_command(empty_repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not match any files"));
}

#[rstest]
fn adding_an_excluded_file_fails_but_directories_skip_it(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child(".git/info/exclude").write_str("*.log\n")?;
    dir.child("debug.log").write_str("noise")?;
    dir.child("keep.txt").write_str("keep")?;

    run_kit_command(dir.path(), &["add", "debug.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ignored"));

    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "keep.txt");

    Ok(())
}

#[rstest]
fn re_adding_unchanged_files_leaves_the_index_alone(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child("one.txt").write_str("one")?;

    run_kit_command(dir.path(), &["add", "one.txt"])
        .assert()
        .success();
    let before = std::fs::read(dir.path().join(".git/index"))?;

    run_kit_command(dir.path(), &["add", "one.txt"])
        .assert()
        .success();
    let after = std::fs::read(dir.path().join(".git/index"))?;

    assert_eq!(before, after);

    Ok(())
}

#[rstest]
fn ls_files_verbose_reports_version_and_entries(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child("hello.txt").write_str("hello\n")?;
    dir.child("docs/readme.md").write_str("# docs\n")?;

    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let output = kit_stdout(dir.path(), &["ls-files", "-v"]);
    let mut lines = output.lines();

    assert_eq!(
        lines.next(),
        Some("Index file format version 0 containing 2 entries")
    );
    assert_eq!(lines.next(), Some("docs/readme.md"));
    assert!(output.contains("mode: 100644 sha: ce013625030ba8dba906f756967f9e9ca394464a"));
    assert!(output.contains("size: 6 "));

    Ok(())
}

#[rstest]
fn ls_files_on_a_fresh_repository_prints_nothing(empty_repository_dir: TempDir) {
    assert_eq!(kit_stdout(empty_repository_dir.path(), &["ls-files"]), "");
}

#[rstest]
fn adding_a_deleted_file_drops_it_from_the_index(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("1.txt"));

    run_kit_command(dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "a/2.txt\na/b/3.txt");
    assert_eq!(
        kit_stdout(dir.path(), &["status", "--porcelain"]),
        "D  1.txt"
    );
}

#[rstest]
fn adding_the_root_drops_entries_of_deleted_directories(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("a"));

    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "1.txt");
}

#[rstest]
fn adding_a_deleted_directory_by_name_drops_its_entries(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("a").join("b"));

    run_kit_command(dir.path(), &["add", "a/b"])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), "1.txt\na/2.txt");
}

#[rstest]
fn adding_the_root_skips_files_in_ignored_directories(
    empty_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = empty_repository_dir;
    dir.child(".gitignore").write_str("node_modules\nbuild/\n")?;
    dir.child("build/out.o").write_str("obj")?;
    dir.child("node_modules/x.js").write_str("js")?;

    run_kit_command(dir.path(), &["add", ".gitignore"])
        .assert()
        .success();
    run_kit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    assert_eq!(kit_stdout(dir.path(), &["ls-files"]), ".gitignore");
    run_kit_command(dir.path(), &["add", "build/out.o"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ignored"));

    Ok(())
}
