//! Test runner implementation
//!
//! ## TestReporter Trait
//!
//! The test runner uses a `TestReporter` trait to separate reporting from
//! execution. This allows for custom output formats (JSON, TAP, etc.) by
//! implementing the trait.
//!
//! ## Case Lifecycle
//!
//! 1. Compile: `<compiler> <fixtures_dir>/<file>`
//! 2. On a non-zero compiler exit, the compiler's own streams are compared and the run phase is skipped
//! 3. Otherwise run the output executable with no arguments
//! 4. Compare stdout/stderr exactly against the manifest
//!
//! The program's exit code is not part of the verdict unless
//! `HarnessConfig::check_program_exit` is set.

use std::io::{self, Stderr, Stdout, Write};
use std::time::{Duration, Instant};

use crate::compare::{StreamMismatch, compare_streams};
use crate::config::HarnessConfig;
use crate::manifest::{Manifest, TestCase};

use super::test_interfaces::{ExecutionResult, ProcessExecutor};

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
///
/// Implement this trait to customize test output format (JSON, TAP, etc.)
pub trait TestReporter {
    /// Called once the cases to run are known
    fn on_run_start(&mut self, _case_count: usize) {}

    /// Called when the compiler rejects a fixture the manifest did not expect
    /// to produce diagnostics for. Informational only.
    fn on_compilation_failure(&mut self, _test: &TestCase, _result: &ExecutionResult) {}

    /// Called when a case completes
    fn on_case_complete(&mut self, test: &TestCase, report: &CaseReport);

    /// Called when all cases have completed
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Pass/fail outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

/// Which subprocess produced the result a case was judged on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The compiler exited non-zero (or could not be started)
    Compile,
    /// The compiled program ran
    Run,
}

/// Result of running a single case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub verdict: Verdict,
    pub phase: Phase,
    /// `None` when the process could not be spawned
    pub result: Option<ExecutionResult>,
    pub mismatches: Vec<StreamMismatch>,
    /// Failure not expressed as a stream mismatch
    pub error: Option<String>,
    pub duration: Duration,
}

impl CaseReport {
    fn compared(test: &TestCase, phase: Phase, result: ExecutionResult, duration: Duration) -> Self {
        let mismatches = compare_streams(test, &result);
        let verdict = if mismatches.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        Self {
            verdict,
            phase,
            result: Some(result),
            mismatches,
            error: None,
            duration,
        }
    }

    fn errored(phase: Phase, error: String, duration: Duration) -> Self {
        Self {
            verdict: Verdict::Fail,
            phase,
            result: None,
            mismatches: Vec::new(),
            error: Some(error),
            duration,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }
}

/// Summary of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// Console Reporter
// ============================================================================

/// Default console reporter: one `OK  ` / `FAIL` line per case.
///
/// Report lines and mismatch diagnostics go to `out`; compiler notes and
/// collection messages go to `err`. Each writer has its own color switch
/// since either stream may be redirected on its own.
pub struct ConsoleReporter<O: Write = Stdout, E: Write = Stderr> {
    out: O,
    err: E,
    pub verbose: bool,
    /// ANSI colors on `out`
    pub color: bool,
    /// ANSI colors on `err`
    pub err_color: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool, color: bool) -> Self {
        Self::with_writers(io::stdout(), io::stderr(), verbose, color)
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn with_writers(out: O, err: E, verbose: bool, color: bool) -> Self {
        Self {
            out,
            err,
            verbose,
            color,
            err_color: color,
        }
    }

    /// Override the color switch for the `err` writer
    pub fn with_err_color(mut self, err_color: bool) -> Self {
        self.err_color = err_color;
        self
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    fn paint(&self, ansi: &str, text: &str) -> String {
        paint(self.color, ansi, text)
    }

    fn paint_err(&self, ansi: &str, text: &str) -> String {
        paint(self.err_color, ansi, text)
    }
}

impl<O: Write, E: Write> TestReporter for ConsoleReporter<O, E> {
    fn on_run_start(&mut self, case_count: usize) {
        if case_count == 0 {
            let _ = writeln!(self.err, "No tests collected");
        }
    }

    fn on_compilation_failure(&mut self, test: &TestCase, result: &ExecutionResult) {
        let header = self.paint_err("1;31", "COMPILATION FAILED");
        let _ = writeln!(
            self.err,
            "{}: {} (exit {})",
            header,
            test.file,
            result.exit_code_label()
        );
        let _ = writeln!(self.err, "Stderr: {}", result.stderr);
    }

    fn on_case_complete(&mut self, test: &TestCase, report: &CaseReport) {
        if let Some(error) = &report.error {
            let _ = writeln!(self.out, "{}", error);
        }
        for mismatch in &report.mismatches {
            let _ = writeln!(self.out, "{}", mismatch);
        }

        let status = if report.passed() {
            self.paint("32", "OK  ")
        } else {
            self.paint("31", "FAIL")
        };

        if self.verbose {
            let _ = writeln!(
                self.out,
                "{}: {} ({}ms)",
                status,
                test.file,
                report.duration.as_millis()
            );
        } else {
            let _ = writeln!(self.out, "{}: {}", status, test.file);
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        if summary.total == 0 {
            return;
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(self.paint("32", &format!("{} passed", summary.passed)));
        }
        if summary.failed > 0 {
            parts.push(self.paint("31", &format!("{} failed", summary.failed)));
        }

        let _ = writeln!(
            self.out,
            "====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

fn paint(enabled: bool, ansi: &str, text: &str) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", ansi, text)
    } else {
        text.to_string()
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Compile, run and judge a single case.
///
/// Never fails: spawn errors become a failing `CaseReport` with `error` set.
#[tracing::instrument(skip_all, fields(file = %test.file))]
pub fn run_case<X, R>(test: &TestCase, config: &HarnessConfig, executor: &X, reporter: &mut R) -> CaseReport
where
    X: ProcessExecutor + ?Sized,
    R: TestReporter + ?Sized,
{
    let start = Instant::now();
    let working_dir = config.working_dir.as_deref();
    let fixture = config.fixture_path(&test.file);

    let compiled = match executor.execute(&config.compiler_program(), &[fixture.as_os_str()], working_dir) {
        Ok(result) => result,
        Err(e) => return CaseReport::errored(Phase::Compile, e.to_string(), start.elapsed()),
    };

    if !compiled.succeeded() {
        tracing::debug!(exit_code = ?compiled.exit_code, "compilation failed, skipping run phase");
        if test.expected_stderr.is_empty() {
            reporter.on_compilation_failure(test, &compiled);
        }
        return CaseReport::compared(test, Phase::Compile, compiled, start.elapsed());
    }

    let ran = match executor.execute(&config.output_program(), &[], working_dir) {
        Ok(result) => result,
        Err(e) => return CaseReport::errored(Phase::Run, e.to_string(), start.elapsed()),
    };

    let mut report = CaseReport::compared(test, Phase::Run, ran, start.elapsed());
    if config.check_program_exit {
        if let Some(result) = report.result.as_ref().filter(|r| !r.succeeded()) {
            report.error = Some(format!("PROGRAM FAILED: exit {}", result.exit_code_label()));
            report.verdict = Verdict::Fail;
        }
    }
    report
}

/// Run every case of `manifest` in declared order.
///
/// With a `filter`, only cases whose `file` contains the keyword run. Each
/// case finishes, subprocesses included, before the next one starts.
pub fn run_manifest<X, R>(
    manifest: &Manifest,
    filter: Option<&str>,
    config: &HarnessConfig,
    executor: &X,
    reporter: &mut R,
) -> TestSummary
where
    X: ProcessExecutor + ?Sized,
    R: TestReporter + ?Sized,
{
    let start_time = Instant::now();

    let selected: Vec<&TestCase> = manifest
        .iter()
        .filter(|t| filter.is_none_or(|keyword| t.file.contains(keyword)))
        .collect();

    reporter.on_run_start(selected.len());

    let mut summary = TestSummary {
        total: selected.len(),
        ..TestSummary::default()
    };

    for test in selected {
        let report = run_case(test, config, executor, reporter);
        if report.passed() {
            summary.passed += 1;
        } else {
            summary.failed += 1;
        }
        reporter.on_case_complete(test, &report);
    }

    summary.duration = start_time.elapsed();
    reporter.on_run_complete(&summary);
    summary
}

// ============================================================================
// Tests
// ============================================================================
