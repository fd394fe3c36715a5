//! Tests for the `langtest` binary

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const FAKE_COMPILER: &str = "#!/bin/sh\ncp \"$1\" a.out\nchmod +x a.out\n";

fn setup() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let compiler = dir.path().join("langc");
    fs::write(&compiler, FAKE_COMPILER).unwrap();
    fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755)).unwrap();

    fs::create_dir_all(dir.path().join("test/files")).unwrap();
    fs::write(dir.path().join("test/files/yes.lang"), "#!/bin/sh\necho yes\n").unwrap();
    fs::write(dir.path().join("test/files/no.lang"), "#!/bin/sh\necho no\n").unwrap();
    fs::write(
        dir.path().join("test/tests.json"),
        r#"[{"file": "yes.lang", "expect-stdout": "yes\n"}, {"file": "no.lang", "expect-stdout": "yes\n"}]"#,
    )
    .unwrap();
    dir
}

fn langtest(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_langtest"))
        .args(args)
        .current_dir(dir)
        .env_remove("LANGTEST_COMPILER")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn run_prints_one_line_per_case_and_exits_zero_by_default() {
    let dir = setup();
    let output = langtest(dir.path(), &["run", "--no-color"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("OK  : yes.lang\n"), "{}", stdout);
    assert!(stdout.contains("Expected stdout: 'yes\n', got 'no\n'\nFAIL: no.lang\n"), "{}", stdout);
    assert!(stdout.contains("1 passed, 1 failed"), "{}", stdout);
}

#[test]
fn exit_policy_on_failure() {
    let dir = setup();
    let output = langtest(dir.path(), &["run", "--no-color", "--exit-policy", "on-failure"]);
    assert_eq!(output.status.code(), Some(1));

    let output = langtest(dir.path(), &["run", "--no-color", "--exit-policy", "on-failure", "-k", "yes"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn malformed_manifest_aborts_before_running() {
    let dir = setup();
    fs::write(dir.path().join("broken.json"), "[{\"file\": ").unwrap();

    let output = langtest(dir.path(), &["run", "--no-color", "broken.json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed manifest"));
    assert!(!dir.path().join("a.out").exists());
}

#[test]
fn list_does_not_run_anything() {
    let dir = setup();
    let output = langtest(dir.path(), &["list"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "yes.lang (expects stdout)\nno.lang (expects stdout)\n2 case(s)\n"
    );
    assert!(!dir.path().join("a.out").exists());
}

#[test]
fn relative_workdir_runs_cases_inside_it() {
    let parent = tempfile::tempdir().unwrap();
    let sub = setup();
    let workdir = parent.path().join("sub");
    fs::rename(sub.path(), &workdir).unwrap();

    let output = langtest(
        parent.path(),
        &["run", "--no-color", "--workdir", "sub", "-k", "yes", "sub/test/tests.json"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("OK  : yes.lang\n"), "{}", stdout);
    assert!(!stdout.contains("failed to spawn"), "{}", stdout);
    assert!(workdir.join("a.out").exists());
    assert!(!parent.path().join("a.out").exists());
}
