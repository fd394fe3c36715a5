//! CLI module for langtest
//!
//! ## Commands
//!
//! - `run [manifest]` - Compile, run and check every case of a manifest
//! - `list [manifest]` - Print the cases of a manifest without running them
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `test_runner` - Case execution and reporting
//! - `test_interfaces` - Subprocess boundary
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_COMPILER, DEFAULT_FIXTURES_DIR, DEFAULT_OUTPUT_EXECUTABLE, HarnessConfig};
use crate::version::LANGTEST_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic through miette's report handler.
    pub fn diagnostic<D>(diagnostic: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const DEFAULT_MANIFEST: &str = "test/tests.json";

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Conformance test harness for the lang compiler
#[derive(Parser, Debug)]
#[command(name = "langtest")]
#[command(version = LANGTEST_VERSION)]
#[command(about = "Compile fixtures, run them, and check their output against a manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile, run and check every case of a manifest
    Run(RunArgs),

    /// List the cases of a manifest
    List {
        /// Manifest file
        #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Manifest file
    #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Compiler under test
    #[arg(long, value_name = "PATH", env = "LANGTEST_COMPILER", default_value = DEFAULT_COMPILER)]
    pub compiler: PathBuf,

    /// Directory the manifest's `file` entries are relative to
    #[arg(long, value_name = "DIR", default_value = DEFAULT_FIXTURES_DIR)]
    pub fixtures: PathBuf,

    /// Executable the compiler writes on success
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT_EXECUTABLE)]
    pub output: PathBuf,

    /// Working directory for the compiler and the compiled program
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Also fail cases whose compiled program exits non-zero
    #[arg(long)]
    pub check_exit_code: bool,

    /// Exit status of the harness itself
    #[arg(long, value_enum, default_value_t = ExitPolicy::Zero)]
    pub exit_policy: ExitPolicy,

    /// Only run cases whose file contains this keyword
    #[arg(short = 'k', value_name = "KEYWORD")]
    pub filter: Option<String>,

    /// Show per-case timings
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

impl RunArgs {
    /// Build the harness configuration from the parsed flags.
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .with_compiler(&self.compiler)
            .with_fixtures_dir(&self.fixtures)
            .with_output_executable(&self.output)
            .with_check_program_exit(self.check_exit_code);
        if let Some(dir) = &self.workdir {
            config = config.with_working_dir(dir);
        }
        config
    }
}

/// How a completed run maps to the harness's own exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExitPolicy {
    /// Always exit 0 once every case has run
    Zero,
    /// Exit 1 when any case failed
    OnFailure,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run(args) => commands::run_suite(&args),
        Command::List { manifest } => commands::list_cases(&manifest),
    }
}

// ============================================================================
// Tests
// ============================================================================
