//! HTTP access for the wallet UI.
//!
//! Every real transport is wrapped in a [`TimedNetwork`], so a request can
//! never hang past its timeout. When no transport exists at all the factory
//! returns an [`UnavailableNetwork`] whose requests fail with an error naming
//! the platform, unless the caller opted into the [`SimulatedNetwork`].

mod http;
mod simulated;
mod timed;
mod transport;
mod unavailable;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

pub use http::ReqwestTransport;
pub use simulated::SimulatedNetwork;
pub use timed::TimedNetwork;
pub use transport::{HttpRequest, HttpTransport, NetworkResponse, TransportError};
pub use unavailable::UnavailableNetwork;

use crate::config::NetworkOptions;
use crate::detect::FeatureSet;
use crate::environment::HostEnvironment;
use crate::{Platform, PlatformResult};

/// Which transport a network adapter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NetworkKind {
    /// Transport supplied through [`NetworkOptions::fetch`].
    Custom,
    /// The host's global `fetch`.
    Native,
    /// A dynamically loaded alternate `fetch`.
    Alternate,
    /// The browser `fetch` polyfill.
    Polyfill,
    /// In-memory simulation. Never reaches the network.
    Simulated,
    /// No transport; every request fails.
    Unavailable,
}

/// Options for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method. Defaults to `GET`.
    pub method: Method,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Overrides the adapter timeout for this request.
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// A `GET` request.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A `POST` request carrying `body`.
    #[must_use]
    pub fn post(body: impl Into<String>) -> Self {
        Self::default()
            .with_method(Method::POST)
            .with_body(body)
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets the content type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PlatformError::Serialization`] if `value` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> PlatformResult<Self> {
        let body = serde_json::to_string(value)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }

    /// Sets a timeout for this request only.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn into_request(self, url: &str) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: url.to_string(),
            headers: self.headers,
            body: self.body,
        }
    }
}

/// HTTP access with a bounded wait.
#[async_trait]
pub trait NetworkAdapter: Send + Sync {
    /// Performs a request. Responses of any status are returned as `Ok`.
    ///
    /// # Errors
    ///
    /// - [`crate::PlatformError::Timeout`] if the request outlives its timeout
    /// - [`crate::PlatformError::FetchUnavailable`] if there is no transport
    /// - [`crate::PlatformError::Network`] if no response was received
    async fn fetch(&self, url: &str, options: RequestOptions) -> PlatformResult<NetworkResponse>;

    /// Whether the network looks reachable. Never fails.
    async fn is_network_available(&self) -> bool;

    /// The transport in use.
    fn kind(&self) -> NetworkKind;
}

/// Selects the transport for a bundle.
///
/// Priority: the caller's transport, the host `fetch`, an alternate `fetch`
/// module, the polyfill on `web` and `nextjs`, and finally the simulated
/// transport if `use_insecure_fallback` is set. Without any of these the
/// returned adapter fails every request.
pub async fn create_network_adapter(
    platform: Platform,
    features: &FeatureSet,
    env: &HostEnvironment,
    options: &NetworkOptions,
) -> Arc<dyn NetworkAdapter> {
    let timed = |transport: Arc<dyn HttpTransport>, kind: NetworkKind| -> Arc<dyn NetworkAdapter> {
        log::debug!("Using {kind} network transport");
        Arc::new(TimedNetwork::new(transport, kind, options))
    };

    if let Some(transport) = &options.fetch {
        return timed(Arc::clone(transport), NetworkKind::Custom);
    }

    if let Some(transport) = env.native_fetch() {
        return timed(Arc::clone(transport), NetworkKind::Native);
    }

    if features.alternate_fetch {
        match env.load_alternate_fetch().await {
            Ok(transport) => return timed(transport, NetworkKind::Alternate),
            Err(err) => log::debug!("Alternate fetch failed to load: {err}"),
        }
    }

    // A loaded polyfill is the global `fetch` it installs.
    if platform.is_browser_like() {
        match env.load_fetch_polyfill().await {
            Ok(transport) => return timed(transport, NetworkKind::Polyfill),
            Err(err) => log::debug!("Fetch polyfill failed to load: {err}"),
        }
    }

    if options.use_insecure_fallback {
        log::warn!(
            "Using simulated network for platform {platform}. Requests never leave the process; do not use in production"
        );
        return Arc::new(SimulatedNetwork::new());
    }

    log::debug!("No fetch implementation available for platform {platform}");
    Arc::new(UnavailableNetwork::new(platform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentMarkers;
    use crate::error::LoadError;
    use crate::test_support::LogCapture;
    use crate::PlatformError;

    fn transport() -> Arc<dyn HttpTransport> {
        Arc::new(ReqwestTransport::new())
    }

    async fn network_for(
        platform: Platform,
        env: &HostEnvironment,
        options: &NetworkOptions,
    ) -> Arc<dyn NetworkAdapter> {
        let features = crate::detect_features(env).await;
        create_network_adapter(platform, &features, env, options).await
    }

    #[tokio::test]
    async fn test_caller_transport_wins() {
        let env = HostEnvironment::empty().with_native_fetch(transport());
        let options = NetworkOptions::default().with_fetch(transport());
        let network = network_for(Platform::Web, &env, &options).await;
        assert_eq!(network.kind(), NetworkKind::Custom);
    }

    #[tokio::test]
    async fn test_native_before_alternate() {
        let env = HostEnvironment::empty()
            .with_native_fetch(transport())
            .with_alternate_fetch(|| Ok(transport()));
        let network = network_for(Platform::ReactNative, &env, &NetworkOptions::default()).await;
        assert_eq!(network.kind(), NetworkKind::Native);
    }

    #[tokio::test]
    async fn test_alternate_fetch_module() {
        let env = HostEnvironment::empty().with_alternate_fetch(|| Ok(transport()));
        let network = network_for(Platform::ReactNative, &env, &NetworkOptions::default()).await;
        assert_eq!(network.kind(), NetworkKind::Alternate);
    }

    #[tokio::test]
    async fn test_polyfill_only_on_browser_like_platforms() {
        let env = HostEnvironment::empty().with_fetch_polyfill(|| Ok(transport()));

        let web = network_for(Platform::Web, &env, &NetworkOptions::default()).await;
        assert_eq!(web.kind(), NetworkKind::Polyfill);

        let rn = network_for(Platform::ReactNative, &env, &NetworkOptions::default()).await;
        assert_eq!(rn.kind(), NetworkKind::Unavailable);
    }

    #[tokio::test]
    async fn test_failed_polyfill_falls_through() {
        let env = HostEnvironment::empty()
            .with_fetch_polyfill(|| Err(LoadError::new("fetch-polyfill", "module not found")));
        let network = network_for(Platform::Nextjs, &env, &NetworkOptions::default()).await;
        assert_eq!(network.kind(), NetworkKind::Unavailable);
    }

    #[tokio::test]
    async fn test_failed_polyfill_reaches_simulated_fallback() {
        let env = HostEnvironment::empty()
            .with_markers(EnvironmentMarkers::browser())
            .with_fetch_polyfill(|| Err(LoadError::new("fetch-polyfill", "module not found")));
        let options = NetworkOptions::default().with_insecure_fallback(true);
        let network = network_for(Platform::Web, &env, &options).await;
        assert_eq!(network.kind(), NetworkKind::Simulated);
    }

    #[tokio::test]
    async fn test_simulated_fallback_is_opt_in_and_announced() {
        let env = HostEnvironment::empty();
        let options = NetworkOptions::default().with_insecure_fallback(true);

        let logs = LogCapture::start();
        let network = network_for(Platform::ReactNative, &env, &options).await;
        assert_eq!(network.kind(), NetworkKind::Simulated);
        assert_eq!(logs.warnings(), 1);
    }

    #[tokio::test]
    async fn test_web_without_fetch_names_platform() {
        let env = HostEnvironment::empty().with_markers(EnvironmentMarkers::browser());
        let network = network_for(Platform::Web, &env, &NetworkOptions::default()).await;

        let err = network
            .fetch("https://api.example.com", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlatformError::FetchUnavailable {
                platform: Platform::Web
            }
        ));
        assert!(err.to_string().contains("web"));
        assert!(!network.is_network_available().await);
    }

    #[test]
    fn test_request_options_builders() {
        let options = RequestOptions::get()
            .with_method(Method::PUT)
            .with_json(&serde_json::json!({ "address": "0xabc" }))
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        assert_eq!(options.method, Method::PUT);
        assert_eq!(options.body.as_deref(), Some(r#"{"address":"0xabc"}"#));
        assert_eq!(
            options.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );

        let request = options.into_request("https://api.example.com/wallets");
        assert_eq!(request.url, "https://api.example.com/wallets");
        assert_eq!(request.method, Method::PUT);
    }
}
