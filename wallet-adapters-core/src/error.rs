use thiserror::Error;

use crate::Platform;

/// Result type for adapter operations that surface errors to callers.
pub type PlatformResult<T, E = PlatformError> = std::result::Result<T, E>;

/// Result type for storage backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error outputs from the crypto and network adapters.
///
/// Storage adapters never return these: their failures are collapsed at the
/// adapter boundary (see [`crate::degraded`]).
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u128,
    },
    /// No HTTP transport exists and the simulated fallback was not enabled.
    #[error("fetch not available for this platform: {platform}")]
    FetchUnavailable {
        /// The platform the adapter was built for.
        platform: Platform,
    },
    /// Network connection or transport error with details
    #[error("network_error: {url} (status: {status:?}): {error}")]
    Network {
        /// The requested URL.
        url: String,
        /// The HTTP status, if a response was received.
        status: Option<u16>,
        /// Description of the failure.
        error: String,
    },
    /// The presented input is not valid for the requested operation
    #[error("invalid_input: {attribute}: {reason}")]
    InvalidInput {
        /// The offending argument.
        attribute: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A crypto primitive failed or returned malformed output
    #[error("crypto_error: {0}")]
    Crypto(String),
    /// Unexpected error serializing or deserializing information
    #[error("serialization_error: {0}")]
    Serialization(String),
}

impl PlatformError {
    /// Returns `true` if this error is a request timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Errors raised by storage backends and host key/value stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The underlying store rejected the operation (quota, security policy, ...).
    #[error("store error: {0}")]
    Store(String),

    /// An in-memory lock was poisoned.
    #[error("storage lock error: {0}")]
    Lock(String),
}

/// An optional module could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("module {module} unavailable: {reason}")]
pub struct LoadError {
    /// Name of the module that failed to load.
    pub module: String,
    /// Why it failed.
    pub reason: String,
}

impl LoadError {
    /// Creates a new load error for `module`.
    #[must_use]
    pub fn new(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            reason: reason.into(),
        }
    }
}
