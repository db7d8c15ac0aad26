use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CODE: &str = "fn main() {\n    println!(\"a file large enough to pass the length gate\");\n}\n";

#[allow(deprecated)]
fn repotale_cmd() -> Command {
    Command::cargo_bin("repotale").expect("failed to find repotale binary")
}

fn project_fixture() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.rs"), CODE).unwrap();
    fs::write(dir.path().join("src/lib.rs"), CODE).unwrap();
    dir
}

#[test]
fn help_describes_the_surface() {
    repotale_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repository root to document"))
        .stdout(predicate::str::contains("--max-tokens"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn dry_run_renders_the_tree_without_a_model() {
    let dir = project_fixture();

    repotale_cmd()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("(project): "))
        .stdout(predicate::str::contains("src (folder): "))
        .stdout(predicate::str::contains("main.rs (file): "));
}

#[test]
fn dry_run_json_emits_a_report() {
    let dir = project_fixture();

    repotale_cmd()
        .arg(dir.path())
        .arg("--dry-run")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"project\""))
        .stdout(predicate::str::contains("\"files_selected\": 2"));
}

#[test]
fn output_flag_writes_the_tale_to_a_file() {
    let dir = project_fixture();
    let out = dir.path().join("tale.txt");

    repotale_cmd()
        .arg(dir.path())
        .arg("--dry-run")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("src (folder): "));
}

#[test]
fn zero_budget_selects_nothing_but_still_succeeds() {
    let dir = project_fixture();

    repotale_cmd()
        .arg(dir.path())
        .arg("--dry-run")
        .arg("--max-tokens")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("(project): "))
        .stdout(predicate::str::contains("src").not());
}

#[test]
fn invalid_root_is_a_configuration_failure() {
    repotale_cmd()
        .arg("/no/such/directory/for/repotale")
        .arg("--dry-run")
        .assert()
        .failure();
}

#[test]
fn invalid_ignore_pattern_is_a_configuration_failure() {
    let dir = project_fixture();

    repotale_cmd()
        .arg(dir.path())
        .arg("--dry-run")
        .arg("--exclude")
        .arg("[")
        .assert()
        .failure();
}
