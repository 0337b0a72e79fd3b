//! Adapter configuration.
//!
//! Options can be built in code or deserialized from JSON handed over by the
//! host application:
//!
//! ```rust
//! use wallet_adapters_core::AdapterOptions;
//!
//! let options = AdapterOptions::from_json(
//!     r#"{ "network": { "timeout_ms": 10000, "max_retries": 2 } }"#,
//! )
//! .unwrap();
//! assert_eq!(options.network.timeout.as_millis(), 10_000);
//! assert!(!options.crypto.use_insecure_crypto);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::network::HttpTransport;
use crate::PlatformResult;

/// Default timeout applied to every network request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the reachability probe, regardless of the request timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Endpoint used by `is_network_available` when none is configured.
pub const DEFAULT_PROBE_URL: &str = "https://clients3.google.com/generate_204";

/// Options for every factory of a bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// Crypto adapter options.
    pub crypto: CryptoOptions,
    /// Network adapter options.
    pub network: NetworkOptions,
}

impl AdapterOptions {
    /// Parses options from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PlatformError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> PlatformResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Options for [`crate::create_crypto_adapter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CryptoOptions {
    /// Forces the insecure fallback even if a secure API is available.
    pub use_insecure_crypto: bool,
}

/// Options for [`crate::create_network_adapter`].
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
    /// Timeout for a whole request, retries included.
    #[serde(rename = "timeout_ms", deserialize_with = "duration_from_millis")]
    pub timeout: Duration,
    /// Allows the in-memory simulated transport when no `fetch` exists.
    /// Never enable this in production.
    pub use_insecure_fallback: bool,
    /// Retries for transient failures (connect errors, 429, 5xx).
    pub max_retries: u32,
    /// URL probed by `is_network_available`.
    pub probe_url: String,
    /// Caller-supplied transport. Always preferred when set.
    #[serde(skip)]
    pub fetch: Option<Arc<dyn HttpTransport>>,
}

impl NetworkOptions {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a caller-supplied transport.
    #[must_use]
    pub fn with_fetch(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.fetch = Some(transport);
        self
    }

    /// Enables the simulated in-memory transport as a last resort.
    #[must_use]
    pub const fn with_insecure_fallback(mut self, enabled: bool) -> Self {
        self.use_insecure_fallback = enabled;
        self
    }

    /// Sets the number of retries for transient failures.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            use_insecure_fallback: false,
            max_retries: 0,
            probe_url: DEFAULT_PROBE_URL.to_string(),
            fetch: None,
        }
    }
}

impl fmt::Debug for NetworkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkOptions")
            .field("timeout", &self.timeout)
            .field("use_insecure_fallback", &self.use_insecure_fallback)
            .field("max_retries", &self.max_retries)
            .field("probe_url", &self.probe_url)
            .field("fetch", &self.fetch.is_some())
            .finish()
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
