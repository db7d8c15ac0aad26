use std::fs;
use std::path::Path;

use repotale::catalog::{FileCatalog, IgnoreMatcher};
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "content").unwrap();
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn enumeration_applies_extension_allow_list() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.py");
    write_file(dir.path(), "b.js");
    write_file(dir.path(), "Makefile");

    let catalog = FileCatalog::new(dir.path(), &strings(&[".py"]), &[]).unwrap();

    assert_eq!(catalog.files(), vec!["a.py"]);
}

#[test]
fn allow_list_entries_work_with_or_without_the_dot() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.py");
    write_file(dir.path(), "b.rs");

    let catalog = FileCatalog::new(dir.path(), &strings(&["py", ".rs"]), &[]).unwrap();

    assert_eq!(catalog.files(), vec!["a.py", "b.rs"]);
}

#[test]
fn ignore_patterns_cover_nested_directories() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.py");
    write_file(dir.path(), "tests/t.py");
    write_file(dir.path(), "src/tests/u.py");
    write_file(dir.path(), "src/ok.py");

    let catalog =
        FileCatalog::new(dir.path(), &strings(&[".py"]), &strings(&["tests"])).unwrap();

    assert_eq!(catalog.files(), vec!["a.py", "src/ok.py"]);
}

#[test]
fn enumeration_order_is_deterministic_and_sorted() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "z.py");
    write_file(dir.path(), "a.py");
    write_file(dir.path(), "lib/m.py");

    let catalog = FileCatalog::new(dir.path(), &strings(&[".py"]), &[]).unwrap();

    let first = catalog.files();
    let second = catalog.files();
    assert_eq!(first, second);
    assert_eq!(first, vec!["a.py", "lib/m.py", "z.py"]);
}

#[test]
fn invalid_pattern_is_rejected_at_construction() {
    let dir = tempdir().unwrap();

    let result = FileCatalog::new(dir.path(), &strings(&[".py"]), &strings(&["["]));

    assert!(result.is_err());
}

#[test]
fn matcher_ignores_a_path_and_everything_under_it() {
    let matcher = IgnoreMatcher::new(&strings(&["vendor"])).unwrap();

    assert!(matcher.is_match("vendor"));
    assert!(matcher.is_match("vendor/lib.py"));
    assert!(matcher.is_match("src/vendor/lib.py"));
    assert!(!matcher.is_match("src/vendored.py"));
}
