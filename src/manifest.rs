//! Test manifest loading
//!
//! A manifest is a JSON array of test case records:
//!
//! ```json
//! [
//!   { "file": "hello.lang", "expect-stdout": "Hello, world!\n" },
//!   { "file": "bad_syntax.lang", "expect-stderr": "SyntaxError: unexpected token\n" }
//! ]
//! ```
//!
//! Missing expectations default to the empty string. The legacy key `expected`
//! is still accepted as a spelling of `expect-stdout`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

/// A single compile-and-run test case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    /// Fixture path, relative to the fixtures directory
    pub file: String,
    /// Exact text the case must produce on stdout
    #[serde(rename = "expect-stdout", alias = "expected", default)]
    pub expected_stdout: String,
    /// Exact text the case must produce on stderr
    #[serde(rename = "expect-stderr", default)]
    pub expected_stderr: String,
}

impl TestCase {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            expected_stdout: String::new(),
            expected_stderr: String::new(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.expected_stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.expected_stderr = stderr.into();
        self
    }
}

/// Ordered, read-only list of test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    cases: Vec<TestCase>,
}

impl Manifest {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// Parse a manifest from JSON text. `path` is only used for error reporting.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ManifestError> {
        let cases: Vec<TestCase> = serde_json::from_str(json).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(index) = cases.iter().position(|case| case.file.is_empty()) {
            return Err(ManifestError::EmptyFile {
                path: path.to_path_buf(),
                index,
            });
        }

        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Errors raised while loading a manifest. Any of these aborts the run.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("cannot read manifest '{}'", .path.display())]
    #[diagnostic(code(langtest::manifest::io), help("pass the manifest path explicitly: `langtest run <MANIFEST>`"))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest '{}'", .path.display())]
    #[diagnostic(
        code(langtest::manifest::parse),
        help(
            "a manifest is a JSON array of {{\"file\": ..., \"expect-stdout\": ..., \"expect-stderr\": ...}} records; \
             `expected` is an older spelling of `expect-stdout` and a record may use only one of the two"
        )
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("test case #{index} in manifest '{}' has an empty `file`", .path.display())]
    #[diagnostic(code(langtest::manifest::empty_file))]
    EmptyFile { path: PathBuf, index: usize },
}

/// Load the manifest at `path`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let json = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = Manifest::from_json(&json, path)?;
    tracing::info!(cases = manifest.len(), "loaded manifest");
    Ok(manifest)
}
