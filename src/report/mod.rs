//! Non-fatal failure reporting.
//!
//! Assertions never return errors or panic. Every failure goes to a
//! [`ReportSink`] exactly once and the calling test keeps running.

mod mismatch;

pub use mismatch::Mismatch;

use crate::error::GoldenError;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Receives assertion failures without interrupting the caller.
pub trait ReportSink {
    /// Records an I/O or encoding failure.
    fn report_error(&self, error: GoldenError);

    /// Records stored content that differs from the payload under test.
    fn report_unequal(&self, mismatch: Mismatch);
}

impl<R: ReportSink + ?Sized> ReportSink for &R {
    fn report_error(&self, error: GoldenError) {
        (**self).report_error(error)
    }

    fn report_unequal(&self, mismatch: Mismatch) {
        (**self).report_unequal(mismatch)
    }
}

/// A failure recorded by a [`Reporter`].
#[derive(Debug)]
pub enum Failure {
    Error(GoldenError),
    Mismatch(Mismatch),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Error(error) => write!(f, "{error}"),
            Failure::Mismatch(mismatch) => write!(f, "{mismatch}"),
        }
    }
}

/// Report sink for Rust's test harness.
///
/// Failures are collected while the test runs. When the reporter is dropped
/// with failures still recorded it panics with all of them, which fails the
/// enclosing test after every assertion has run. Nothing is raised if the
/// thread is already unwinding.
///
/// ```no_run
/// use golden::{Golden, Reporter};
///
/// let reporter = Reporter::new();
/// let golden = Golden::new(&reporter);
/// golden.assert_bytes("first", b"one");
/// golden.assert_bytes("second", b"two");
/// ```
#[derive(Debug, Default)]
pub struct Reporter {
    failures: Mutex<Vec<Failure>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures currently recorded.
    pub fn failures_len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_clean(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns every recorded failure.
    pub fn take(&self) -> Vec<Failure> {
        std::mem::take(&mut *self.lock())
    }

    /// Drops the reporter now, panicking if any failure was recorded.
    pub fn finish(self) {}

    fn lock(&self) -> MutexGuard<'_, Vec<Failure>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportSink for Reporter {
    fn report_error(&self, error: GoldenError) {
        warn!(kind = ?error.kind(), "{error}");
        self.lock().push(Failure::Error(error));
    }

    fn report_unequal(&self, mismatch: Mismatch) {
        warn!(path = %mismatch.path.display(), "golden fixture content differs");
        self.lock().push(Failure::Mismatch(mismatch));
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let failures = self.take();
        if failures.is_empty() {
            return;
        }
        let mut summary = format!("{} golden assertion(s) failed:", failures.len());
        for failure in &failures {
            let _ = write!(summary, "\n  - {failure}");
        }
        panic!("{summary}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::panic::{self, AssertUnwindSafe};
    use std::path::PathBuf;

    fn open_error() -> GoldenError {
        GoldenError::Open {
            path: PathBuf::from("testdata/missing.golden"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        }
    }

    fn sample_mismatch() -> Mismatch {
        Mismatch {
            path: PathBuf::from("testdata/sample.golden"),
            want: vec![1, 2, 3],
            got: vec![1, 2, 0xFF],
        }
    }

    // ===========================================
    // Cycle 1: Recording
    // ===========================================

    #[test]
    fn new_reporter_is_clean() {
        let reporter = Reporter::new();
        assert!(reporter.is_clean());
        reporter.finish();
    }

    #[test]
    fn reports_are_recorded_in_order() {
        let reporter = Reporter::new();
        reporter.report_error(open_error());
        reporter.report_unequal(sample_mismatch());

        let failures = reporter.take();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0], Failure::Error(GoldenError::Open { .. })));
        assert!(matches!(&failures[1], Failure::Mismatch(m) if m == &sample_mismatch()));
        assert!(reporter.is_clean());
    }

    fn report_through<S: ReportSink>(sink: S) {
        sink.report_error(open_error());
    }

    #[test]
    fn sink_works_through_reference() {
        let reporter = Reporter::new();
        report_through(&reporter);
        report_through(&reporter as &dyn ReportSink);
        assert_eq!(reporter.failures_len(), 2);
        reporter.take();
    }

    // ===========================================
    // Cycle 2: Failing the Test on Drop
    // ===========================================

    #[test]
    fn dropping_with_failures_panics_with_summary() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let reporter = Reporter::new();
            reporter.report_error(open_error());
            reporter.report_unequal(sample_mismatch());
        }));

        let payload = result.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert!(message.starts_with("2 golden assertion(s) failed:"));
        assert!(message.contains("testdata/missing.golden"));
        assert!(message.contains("content mismatch for testdata/sample.golden"));
    }

    #[test]
    fn dropping_clean_reporter_does_not_panic() {
        let result = panic::catch_unwind(|| {
            let reporter = Reporter::new();
            reporter.finish();
        });
        assert!(result.is_ok());
    }

    #[test]
    fn dropping_while_unwinding_does_not_double_panic() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let reporter = Reporter::new();
            reporter.report_error(open_error());
            panic!("original failure");
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"original failure"));
    }
}
