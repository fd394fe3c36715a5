//! Expected/actual stream comparison
//!
//! Comparison is exact byte-for-byte string equality. Nothing is trimmed and
//! line endings are not normalized: `"ok\n"` and `"ok\r\n"` are different
//! outputs, and so are `"ok"` and `"ok\n"`.

use std::fmt;

use crate::cli::test_interfaces::ExecutionResult;
use crate::manifest::TestCase;

/// Captured output stream of a subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stream whose captured text differs from the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMismatch {
    pub stream: Stream,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for StreamMismatch {
    /// Both values are written verbatim, embedded newlines included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected {}: '{}', got '{}'", self.stream, self.expected, self.actual)
    }
}

/// Compare a result against a case's expectations.
///
/// Returns every mismatching stream, stdout first. An empty vector means the
/// case passes.
pub fn compare_streams(case: &TestCase, result: &ExecutionResult) -> Vec<StreamMismatch> {
    [
        (Stream::Stdout, &case.expected_stdout, &result.stdout),
        (Stream::Stderr, &case.expected_stderr, &result.stderr),
    ]
    .into_iter()
    .filter(|(_, expected, actual)| expected != actual)
    .map(|(stream, expected, actual)| StreamMismatch {
        stream,
        expected: expected.clone(),
        actual: actual.clone(),
    })
    .collect()
}
