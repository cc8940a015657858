/// Failure reporting
///
/// Sentinel-returning operations never propagate errors. They hand the
/// failure to a [`FailureSink`] and return their "nothing found" value.
use std::sync::{Mutex, PoisonError};
use crate::core::BindError;

pub trait FailureSink: Send + Sync {
    fn notify(&self, operation: &str, failure: &BindError);
}

/// Writes failures to the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl FailureSink for LogSink {
    fn notify(&self, operation: &str, failure: &BindError) {
        log::error!("{operation} failed: {failure}");
    }
}

/// Keeps every reported failure in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(operation, message)` pairs in report order.
    #[must_use]
    pub fn failures(&self) -> Vec<(String, String)> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureSink for RecordingSink {
    fn notify(&self, operation: &str, failure: &BindError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation.to_string(), failure.to_string()));
    }
}

/// Unwraps `result`, or reports the error once and returns `fallback()`.
pub(crate) fn guard<T>(
    sink: &dyn FailureSink,
    operation: &str,
    result: Result<T, BindError>,
    fallback: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            sink.notify(operation, &e);
            fallback()
        }
    }
}
