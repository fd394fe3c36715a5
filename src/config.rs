//! Harness configuration
//!
//! Every location the harness touches is held here and passed in explicitly.
//! Defaults follow the conventional layout of the lang repository: the
//! compiler binary `./langc`, fixtures under `test/files`, and the compiled
//! program written to `./a.out`.

use std::path::{Path, PathBuf};

/// Default compiler executable
pub const DEFAULT_COMPILER: &str = "./langc";
/// Default fixtures root
pub const DEFAULT_FIXTURES_DIR: &str = "test/files";
/// Default path of the program produced by a successful compile
pub const DEFAULT_OUTPUT_EXECUTABLE: &str = "./a.out";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Compiler under test, invoked as `<compiler> <fixture>`
    pub compiler: PathBuf,
    /// Directory the manifest's `file` entries are relative to
    pub fixtures_dir: PathBuf,
    /// Executable the compiler materializes on success
    pub output_executable: PathBuf,
    /// Working directory for both subprocesses (`None` inherits the harness's)
    pub working_dir: Option<PathBuf>,
    /// Fail a case when the compiled program exits non-zero
    pub check_program_exit: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            output_executable: PathBuf::from(DEFAULT_OUTPUT_EXECUTABLE),
            working_dir: None,
            check_program_exit: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compiler executable
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Set the fixtures root
    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    /// Set the output executable path
    pub fn with_output_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_executable = path.into();
        self
    }

    /// Run subprocesses in `dir`
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Treat a non-zero program exit as a failure
    pub fn with_check_program_exit(mut self, check: bool) -> Self {
        self.check_program_exit = check;
        self
    }

    /// Full path of a fixture, as handed to the compiler.
    pub fn fixture_path(&self, file: &str) -> PathBuf {
        self.fixtures_dir.join(file)
    }

    /// Compiler path as it will be spawned.
    pub fn compiler_program(&self) -> PathBuf {
        self.resolve(&self.compiler)
    }

    /// Output executable path as it will be spawned.
    pub fn output_program(&self) -> PathBuf {
        self.resolve(&self.output_executable)
    }

    /// Anchor a relative program path (`./a.out`, `bin/langc`) to the working
    /// directory. Bare names (`langc`) are left for `PATH` lookup.
    ///
    /// The child is spawned after changing into the working directory, so the
    /// anchored path must be absolute or a relative `working_dir` would be
    /// applied twice.
    fn resolve(&self, program: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if program.is_relative() && program.components().count() > 1 => {
                let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.clone());
                dir.join(program)
            }
            _ => program.to_path_buf(),
        }
    }
}
