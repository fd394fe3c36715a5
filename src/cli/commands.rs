//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::manifest::{Manifest, load_manifest};

use super::test_interfaces::SystemExecutor;
use super::test_runner::{ConsoleReporter, TestSummary, run_manifest};
use super::{CliError, CliResult, ExitCode, ExitPolicy, RunArgs};

/// Run every case of the manifest named in `args`.
///
/// A manifest that cannot be loaded aborts before any case runs. Once the
/// cases have run, the exit code follows `args.exit_policy`.
pub fn run_suite(args: &RunArgs) -> CliResult<ExitCode> {
    let manifest = load_manifest(&args.manifest).map_err(CliError::diagnostic)?;
    let config = args.config();

    let color = !args.no_color && io::stdout().is_terminal();
    let err_color = !args.no_color && io::stderr().is_terminal();
    let mut reporter = ConsoleReporter::new(args.verbose, color).with_err_color(err_color);

    let summary = run_manifest(
        &manifest,
        args.filter.as_deref(),
        &config,
        &SystemExecutor,
        &mut reporter,
    );

    Ok(exit_code_for(&summary, args.exit_policy))
}

/// Map a finished run to the harness's exit code.
pub fn exit_code_for(summary: &TestSummary, policy: ExitPolicy) -> ExitCode {
    match policy {
        ExitPolicy::Zero => ExitCode::SUCCESS,
        ExitPolicy::OnFailure if summary.all_passed() => ExitCode::SUCCESS,
        ExitPolicy::OnFailure => ExitCode::FAILURE,
    }
}

/// Print the cases of a manifest without running anything.
pub fn list_cases(manifest_path: &Path) -> CliResult<ExitCode> {
    let manifest = load_manifest(manifest_path).map_err(CliError::diagnostic)?;
    let mut out = io::stdout().lock();
    write_case_list(&manifest, &mut out)
        .map_err(|e| CliError::failure(format!("Error writing case list: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

/// One line per case: the fixture, then the streams it has expectations for.
pub fn write_case_list(manifest: &Manifest, out: &mut impl Write) -> io::Result<()> {
    for case in manifest {
        let mut expects = Vec::new();
        if !case.expected_stdout.is_empty() {
            expects.push("stdout");
        }
        if !case.expected_stderr.is_empty() {
            expects.push("stderr");
        }
        if expects.is_empty() {
            writeln!(out, "{} (expects no output)", case.file)?;
        } else {
            writeln!(out, "{} (expects {})", case.file, expects.join(", "))?;
        }
    }
    writeln!(out, "{} case(s)", manifest.len())
}
