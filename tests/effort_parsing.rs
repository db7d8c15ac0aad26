use std::fs;
use std::process::Command;

use repotale::effort::{parse_effort, EffortMap, GitEffort};
use tempfile::tempdir;

#[test]
fn parses_dot_padded_rows() {
    let output = "file commits days\n\
                  src/file1.py..... 10 2\n\
                  src/file2.py..... 5 1";

    let effort = parse_effort(output);

    assert_eq!(effort.len(), 2);
    assert_eq!(effort.get("src/file1.py"), 10);
    assert_eq!(effort.get("src/file2.py"), 5);
}

#[test]
fn header_rows_are_skipped() {
    let output = "file commits days\nMakefile........ 3 1";

    let effort = parse_effort(output);

    assert_eq!(effort.len(), 1);
    assert_eq!(effort.get("Makefile"), 3);
    assert_eq!(effort.get("file"), 0);
}

#[test]
fn unparsable_commit_count_scores_one() {
    let output = "src/file1.py..... dog 2\nsrc/file2.py..... 5 1";

    let effort = parse_effort(output);

    assert_eq!(effort.get("src/file1.py"), 1);
    assert_eq!(effort.get("src/file2.py"), 5);
}

#[test]
fn empty_output_parses_to_empty_map() {
    let effort = parse_effort("");
    assert!(effort.is_empty());
}

#[test]
fn missing_entries_read_as_zero() {
    let mut effort = EffortMap::new();
    effort.insert("src/known.rs", 4);

    assert_eq!(effort.get("src/known.rs"), 4);
    assert_eq!(effort.get("src/unknown.rs"), 0);
}

#[tokio::test]
async fn effort_from_a_real_repository() {
    if Command::new("git").arg("--version").output().is_err() {
        return; // no git on this machine, nothing to exercise
    }

    let dir = tempdir().unwrap();
    let git = |args: &[&str]| {
        let status = Command::new("git")
            .args([
                "-c",
                "user.email=test@example.com",
                "-c",
                "user.name=test",
            ])
            .args(args)
            .current_dir(dir.path())
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    };

    git(&["init", "-q"]);
    fs::write(dir.path().join("touched.rs"), "fn a() {}").unwrap();
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "one"]);
    fs::write(dir.path().join("touched.rs"), "fn a() {}\nfn b() {}").unwrap();
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "two"]);

    let source = GitEffort::new(dir.path());
    let effort = source.effort().await.unwrap();
    assert!(effort.get("touched.rs") >= 2);

    let commits = source.commit_count().await.unwrap();
    assert_eq!(commits, 2);
}

#[test]
fn bump_accumulates_occurrences() {
    let mut effort = EffortMap::new();
    effort.bump("src/a.rs");
    effort.bump("src/a.rs");
    effort.bump("src/b.rs");

    assert_eq!(effort.get("src/a.rs"), 2);
    assert_eq!(effort.get("src/b.rs"), 1);
}
