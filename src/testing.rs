//! Helpers for numeric test harnesses.
//!
//! Available to this crate's own tests and, with the `testing` feature, to downstream
//! crates.

use thiserror::Error;
use tracing::{error, info};

use crate::Element;

/// Compare two sequences element by element within `tolerance`.
///
/// When the lengths differ, the missing tail of the shorter sequence is treated as zeros.
pub fn is_approx_equal<T: Element>(a: &[T], b: &[T], tolerance: T) -> bool {
    let common = a.len().min(b.len());
    let head = a[..common]
        .iter()
        .zip(&b[..common])
        .all(|(&x, &y)| T::is_close(x, y, tolerance));
    let tail = a[common..]
        .iter()
        .chain(&b[common..])
        .all(|&x| T::is_close(x, T::zero(), tolerance));
    head && tail
}

/// Compare two lists of sequences with [`is_approx_equal`]. The outer lengths must match.
pub fn is_nested_approx_equal<T, A, B>(a: &[A], b: &[B], tolerance: T) -> bool
where
    T: Element,
    A: AsRef<[T]>,
    B: AsRef<[T]>,
{
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| is_approx_equal(x.as_ref(), y.as_ref(), tolerance))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("critical test failed: {0}")]
pub struct TestFailure(pub String);

/// Collects pass/fail results of named checks.
#[derive(Debug, Default)]
pub struct TestReporter {
    passed: usize,
    failed: usize,
}

impl TestReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_success(&mut self, description: &str) {
        self.passed += 1;
        info!("{description}... Success");
    }

    pub fn report_failure(&mut self, description: &str) {
        self.failed += 1;
        error!("{description}... Failed");
    }

    /// Record and report a check. Returns `success`.
    pub fn process_test(&mut self, description: &str, success: bool) -> bool {
        if success {
            self.report_success(description);
        } else {
            self.report_failure(description);
        }
        success
    }

    /// Like [`process_test`](Self::process_test) but stays silent on success.
    pub fn process_quiet_test(&mut self, description: &str, success: bool) -> bool {
        if success {
            self.passed += 1;
        } else {
            self.report_failure(description);
        }
        success
    }

    /// Like [`process_test`](Self::process_test), but a failure is returned as an error
    /// so the harness can stop early.
    pub fn process_critical_test(
        &mut self,
        description: &str,
        success: bool,
    ) -> Result<(), TestFailure> {
        if self.process_test(description, success) {
            Ok(())
        } else {
            Err(TestFailure(description.to_string()))
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn did_fail(&self) -> bool {
        self.failed > 0
    }

    /// Process exit code for the harness: 1 if any check failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.did_fail())
    }
}
