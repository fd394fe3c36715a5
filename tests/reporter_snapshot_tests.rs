//! Golden snapshot of the console reporter
//!
//! Review changes: `cargo insta review`

use std::time::Duration;

use langtest::{
    CaseReport, ConsoleReporter, ExecutionResult, Phase, Stream, StreamMismatch, TestCase, TestReporter, TestSummary,
    Verdict,
};

fn render(verbose: bool) -> String {
    let mut reporter = ConsoleReporter::with_writers(Vec::new(), Vec::new(), verbose, false);

    let hello = TestCase::new("hello.lang").with_stdout("Hello, world!\n");
    reporter.on_case_complete(
        &hello,
        &CaseReport {
            verdict: Verdict::Pass,
            phase: Phase::Run,
            result: Some(ExecutionResult::new(Some(0), "Hello, world!\n", "")),
            mismatches: Vec::new(),
            error: None,
            duration: Duration::from_millis(12),
        },
    );

    let off_by_one = TestCase::new("off_by_one.lang").with_stdout("42\n");
    reporter.on_case_complete(
        &off_by_one,
        &CaseReport {
            verdict: Verdict::Fail,
            phase: Phase::Run,
            result: Some(ExecutionResult::new(Some(0), "41\n", "")),
            mismatches: vec![StreamMismatch {
                stream: Stream::Stdout,
                expected: "42\n".to_string(),
                actual: "41\n".to_string(),
            }],
            error: None,
            duration: Duration::from_millis(3),
        },
    );

    let missing = TestCase::new("missing.lang");
    reporter.on_case_complete(
        &missing,
        &CaseReport {
            verdict: Verdict::Fail,
            phase: Phase::Run,
            result: None,
            mismatches: Vec::new(),
            error: Some("failed to spawn './a.out': not found".to_string()),
            duration: Duration::ZERO,
        },
    );

    reporter.on_run_complete(&TestSummary {
        total: 3,
        passed: 1,
        failed: 2,
        duration: Duration::from_millis(1500),
    });

    let (out, err) = reporter.into_writers();
    assert!(err.is_empty());
    String::from_utf8(out).unwrap()
}

#[test]
fn test_console_report() {
    insta::assert_snapshot!(render(false), @r"
OK  : hello.lang
Expected stdout: '42
', got '41
'
FAIL: off_by_one.lang
failed to spawn './a.out': not found
FAIL: missing.lang
====== 1 passed, 2 failed in 1.50s ======
");
}

#[test]
fn test_console_report_verbose() {
    insta::assert_snapshot!(render(true), @r"
OK  : hello.lang (12ms)
Expected stdout: '42
', got '41
'
FAIL: off_by_one.lang (3ms)
failed to spawn './a.out': not found
FAIL: missing.lang (0ms)
====== 1 passed, 2 failed in 1.50s ======
");
}
