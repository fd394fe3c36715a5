#![forbid(unsafe_code)]
//! Conformance test harness for the lang compiler
//!
//! `langtest` reads a manifest of test cases, compiles each fixture with the
//! compiler under test, runs the produced executable and compares its captured
//! stdout/stderr against the expectations in the manifest.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Execution Model
//!
//! Cases run strictly one after another. The compiler writes its output to a single, fixed executable path,
//! so two cases can never be in flight at the same time.

pub mod cli;
pub mod compare;
pub mod config;
pub mod manifest;
pub mod version;

pub use cli::test_interfaces::{ExecutionResult, ProcessExecutor, SystemExecutor, TestError};
pub use cli::test_runner::{
    CaseReport, ConsoleReporter, Phase, TestReporter, TestSummary, Verdict, run_case, run_manifest,
};
pub use compare::{Stream, StreamMismatch, compare_streams};
pub use config::HarnessConfig;
pub use manifest::{Manifest, ManifestError, TestCase, load_manifest};
