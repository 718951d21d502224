use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("batch-rename").unwrap();
    cmd.env_remove("BATCH_RENAME_EXCLUDE")
        .env_remove("BATCH_RENAME_HISTORY")
        .env("NO_COLOR", "1");
    cmd
}

/// root/{a.spec.ts, b.spec.ts, node_modules/x.spec.ts}
fn create_spec_tree(dir: &Path) {
    fs::write(dir.join("a.spec.ts"), "a").unwrap();
    fs::write(dir.join("b.spec.ts"), "b").unwrap();
    fs::create_dir(dir.join("node_modules")).unwrap();
    fs::write(dir.join("node_modules").join("x.spec.ts"), "x").unwrap();
}

fn find_history(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("batch-rename-history-"))
        })
}

#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename files matching a regex"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_renames_matching_files_and_honours_exclusions() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", r"\.spec\.ts$", "-r", ".test.ts", "-e", "node_modules", "-y"])
        .arg("--no-history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully renamed 2 files."));

    assert!(dir.path().join("a.test.ts").exists());
    assert!(dir.path().join("b.test.ts").exists());
    assert!(!dir.path().join("a.spec.ts").exists());
    assert!(dir.path().join("node_modules").join("x.spec.ts").exists());
    assert!(find_history(dir.path()).is_none());
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", r"\.spec\.ts$", "-r", ".test.ts", "--dry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY-RUN MODE:"))
        .stdout(predicate::str::contains("a.test.ts"))
        .stdout(predicate::str::contains("x.test.ts"))
        .stdout(predicate::str::contains("Dry-run completed. Bye"));

    assert!(dir.path().join("a.spec.ts").exists());
    assert!(!dir.path().join("a.test.ts").exists());
    assert!(find_history(dir.path()).is_none());
}

#[test]
fn test_collision_is_rejected_before_any_rename() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1.txt"), "").unwrap();
    fs::write(dir.path().join("a2.txt"), "").unwrap();

    cmd()
        .arg(dir.path())
        .args(["-p", r"\d", "-r", "", "-y"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("a.txt"));

    assert!(dir.path().join("a1.txt").exists());
    assert!(dir.path().join("a2.txt").exists());
}

#[test]
fn test_missing_exclusion_aborts() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", "spec", "-r", "test", "-e", "does-not-exist", "-y"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Excluded directory does not exist"));

    assert!(dir.path().join("a.spec.ts").exists());
}

#[test]
fn test_invalid_regex() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path())
        .args(["-p", "(unclosed", "-r", "x", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid regex pattern"));
}

#[test]
fn test_replacement_with_unknown_group_aborts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ab-12.txt"), "").unwrap();

    cmd()
        .arg(dir.path())
        .args(["-p", r"^(\w+)-(\d+)", "-r", r"\3_\1", "-y", "--no-history"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid group reference 3"));

    assert!(dir.path().join("ab-12.txt").exists());
    assert!(!dir.path().join("_ab.txt").exists());
}

#[test]
fn test_missing_root_directory() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path().join("nope"))
        .args(["-p", "a", "-r", "b", "-y"])
        .assert()
        .code(3);
}

#[test]
fn test_no_matches_exits_cleanly() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", r"\.rs$", "-r", ".txt", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r"No matches found for provided pattern: \.rs$. Bye",
        ));
}

#[test]
fn test_declined_confirmation_aborts() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", r"\.spec\.ts$", "-r", ".test.ts"])
        .write_stdin("N\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Abort"))
        .stderr(predicate::str::contains("Y/N"));

    assert!(dir.path().join("a.spec.ts").exists());
    assert!(!dir.path().join("a.test.ts").exists());
}

#[test]
fn test_interactive_prompts() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .arg("--no-history")
        .write_stdin("node_modules\n\\.spec\\.ts$\n.test.ts\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully renamed 2 files."));

    assert!(dir.path().join("a.test.ts").exists());
    assert!(dir.path().join("node_modules").join("x.spec.ts").exists());
}

#[test]
fn test_empty_interactive_pattern() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path())
        .write_stdin("\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Empty pattern provided. Bye"));
}

#[test]
fn test_capture_group_replacement() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("IMG_001.jpg"), "").unwrap();
    fs::write(dir.path().join("IMG_002.jpg"), "").unwrap();

    cmd()
        .arg(dir.path())
        .args(["-p", r"^IMG_(\d+)", "-r", r"photo-\1", "-y", "--no-history"])
        .assert()
        .success();

    assert!(dir.path().join("photo-001.jpg").exists());
    assert!(dir.path().join("photo-002.jpg").exists());
}

#[test]
fn test_revert_from_history() {
    let dir = tempdir().unwrap();
    create_spec_tree(dir.path());

    cmd()
        .arg(dir.path())
        .args(["-p", r"\.spec\.ts$", "-r", ".test.ts", "-e", "node_modules", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("History saved to"));

    let history = find_history(dir.path()).expect("history file written");
    assert!(dir.path().join("a.test.ts").exists());

    cmd()
        .arg("--revert")
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rollback: 2 of 2 renames undone."));

    assert!(dir.path().join("a.spec.ts").exists());
    assert!(dir.path().join("b.spec.ts").exists());
    assert!(!dir.path().join("a.test.ts").exists());
}

#[test]
fn test_revert_missing_history_file() {
    let dir = tempdir().unwrap();

    cmd()
        .arg("--revert")
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(8)
        .stderr(predicate::str::contains("History file error"));
}

#[test]
fn test_revert_conflicts_with_pattern() {
    cmd()
        .args(["--revert", "h.json", "-p", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
