//! Explicit degradation records.
//!
//! Storage backends report failures as [`Degraded`] values instead of
//! surfacing errors. The adapter boundary collapses an [`Outcome`] into a plain
//! value with [`Collapse::or_degrade`], logging the degradation once per call.

use thiserror::Error;

use crate::StorageError;

/// Result of an operation that may degrade to a safe default.
pub type Outcome<T> = Result<T, Degraded>;

/// Describes why an operation fell back to its safe default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} degraded: {reason}")]
pub struct Degraded {
    /// The operation that degraded (e.g. `storage.set_item`).
    pub operation: &'static str,
    /// The underlying cause.
    pub reason: String,
}

impl Degraded {
    /// Creates a new degradation record.
    #[must_use]
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns a closure mapping a [`StorageError`] into a degradation of `operation`.
    #[must_use]
    pub fn storage(operation: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |error| Self::new(operation, error.to_string())
    }
}

/// Collapses an [`Outcome`] into a plain value at an adapter boundary.
pub trait Collapse<T> {
    /// Returns the success value, or logs a warning and returns `fallback`.
    fn or_degrade(self, fallback: T) -> T;
}

impl<T> Collapse<T> for Outcome<T> {
    fn or_degrade(self, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(degraded) => {
                log::warn!("{degraded}");
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogCapture;

    #[test]
    fn test_collapse_success_does_not_log() {
        let logs = LogCapture::start();
        let value = Outcome::Ok(7).or_degrade(0);
        assert_eq!(value, 7);
        assert_eq!(logs.warnings(), 0);
    }

    #[test]
    fn test_collapse_degraded_logs_once_and_falls_back() {
        let outcome: Outcome<Option<String>> = Err(Degraded::storage("storage.get_item")(
            StorageError::Store("quota exceeded".to_string()),
        ));
        let logs = LogCapture::start();
        let value = outcome.or_degrade(None);
        assert_eq!(value, None);
        assert_eq!(logs.warnings(), 1);
        assert!(logs.messages()[0].contains("storage.get_item degraded"));
        assert!(logs.messages()[0].contains("quota exceeded"));
    }
}
