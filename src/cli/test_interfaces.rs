//! Test runner process boundary
//!
//! Both subprocesses the harness starts, the compiler and the program it
//! produced, go through the `ProcessExecutor` trait. The runner only sees
//! captured results, which allows for:
//! - Driving the runner from scripted results in unit tests
//! - Custom execution strategies (wrappers, remote execution)
//!
//! `SystemExecutor` is the real implementation on top of `std::process`.
//! Every call blocks until the child exits.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors that occur at the process boundary
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to spawn '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Captured outcome of one subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Only a clean `0` exit counts as success.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code for display, `signal` when there is none.
    pub fn exit_code_label(&self) -> String {
        match self.exit_code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

// ============================================================================
// Process Executor Interface
// ============================================================================

/// Run a program to completion and capture its output.
pub trait ProcessExecutor {
    /// Run `program` with `args` (stdin closed) in `working_dir`, or in the
    /// current directory when `None`, and wait for it to exit.
    fn execute(&self, program: &Path, args: &[&OsStr], working_dir: Option<&Path>)
    -> Result<ExecutionResult, TestError>;
}

/// `std::process::Command` based executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(
        &self,
        program: &Path,
        args: &[&OsStr],
        working_dir: Option<&Path>,
    ) -> Result<ExecutionResult, TestError> {
        tracing::debug!(program = %program.display(), ?args, "spawning");

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| TestError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(program = %program.display(), exit_code = ?result.exit_code, "exited");

        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_requires_zero() {
        assert!(ExecutionResult::new(Some(0), "", "").succeeded());
        assert!(!ExecutionResult::new(Some(1), "", "").succeeded());
        assert!(!ExecutionResult::new(None, "", "").succeeded());
    }

    #[test]
    fn test_exit_code_label() {
        assert_eq!(ExecutionResult::new(Some(3), "", "").exit_code_label(), "3");
        assert_eq!(ExecutionResult::new(None, "", "").exit_code_label(), "signal");
    }

    #[test]
    fn test_spawn_missing_program() {
        let err = SystemExecutor
            .execute(Path::new("./no-such-compiler-here"), &[], None)
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to spawn './no-such-compiler-here': "));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_both_streams_and_exit_code() {
        let script = OsStr::new("printf 'out\\n'; printf 'err' >&2; exit 7");
        let result = SystemExecutor
            .execute(Path::new("sh"), &[OsStr::new("-c"), script], None)
            .unwrap();
        assert_eq!(result, ExecutionResult::new(Some(7), "out\n", "err"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_is_closed() {
        let result = SystemExecutor
            .execute(Path::new("sh"), &[OsStr::new("-c"), OsStr::new("cat")], None)
            .unwrap();
        assert_eq!(result, ExecutionResult::new(Some(0), "", ""));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let dir = std::env::temp_dir();
        let result = SystemExecutor
            .execute(Path::new("sh"), &[OsStr::new("-c"), OsStr::new("pwd")], Some(&dir))
            .unwrap();
        let reported = PathBuf::from(result.stdout.trim_end());
        assert_eq!(reported.canonicalize().unwrap(), dir.canonicalize().unwrap());
    }
}
