//! Host environment description.
//!
//! The wallet UI runs inside very different hosts: a browser tab, a Next.js
//! server, a React Native bundle. Instead of poking at globals, the host
//! registers what it has at startup: environment markers, the capabilities it
//! exposes directly (`localStorage`, `WebCrypto`, `fetch`) and loaders for
//! optional modules that may or may not resolve.
//!
//! # Providers
//!
//! - [`KeyValueStore`]: synchronous durable storage (`localStorage`)
//! - [`AsyncKeyValueStore`]: React Native persistent storage
//! - [`SecureCryptoApi`]: secure randomness and digests
//! - [`HttpTransport`]: an HTTP `fetch` implementation
//! - [`ModuleLoader`]: best-effort loading of any of the above

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::crypto::OsCrypto;
use crate::network::HttpTransport;
use crate::{LoadError, PlatformResult, StorageResult};

/// Synchronous key/value store with browser `localStorage` semantics.
///
/// Every call may fail, e.g. with a security or quota error in private
/// browsing modes.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Asynchronous key/value store with React Native `AsyncStorage` semantics.
#[async_trait]
pub trait AsyncKeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the native module fails.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the native module fails.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the native module fails.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Platform-native secure randomness and digest primitives.
#[async_trait]
pub trait SecureCryptoApi: Send + Sync {
    /// Whether the secure random entry point exists.
    fn supports_random_values(&self) -> bool {
        true
    }

    /// Whether the digest entry point exists.
    fn supports_digest(&self) -> bool {
        true
    }

    /// Fills `dest` with cryptographically secure random bytes.
    ///
    /// Callers never pass more than [`crate::crypto::MAX_RANDOM_CHUNK`] bytes at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the random source is unavailable.
    fn fill_random(&self, dest: &mut [u8]) -> PlatformResult<()>;

    /// Digests `data` with `algorithm` (e.g. `"SHA-256"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is unsupported or the digest fails.
    async fn digest(&self, algorithm: &str, data: &[u8]) -> PlatformResult<Vec<u8>>;
}

/// Best-effort loader for an optional module.
///
/// Plain closures returning `Result<T, LoadError>` are loaders.
#[async_trait]
pub trait ModuleLoader<T>: Send + Sync {
    /// Attempts to load the module.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the module is absent or fails to initialise.
    async fn load(&self) -> Result<T, LoadError>;
}

#[async_trait]
impl<T, F> ModuleLoader<T> for F
where
    F: Fn() -> Result<T, LoadError> + Send + Sync,
    T: Send + 'static,
{
    async fn load(&self) -> Result<T, LoadError> {
        self()
    }
}

/// Shared handle to a module loader.
pub type SharedLoader<T> = Arc<dyn ModuleLoader<T>>;

/// Globals that identify the kind of host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentMarkers {
    /// A `window` global exists.
    pub window: bool,
    /// A `document` global exists.
    pub document: bool,
    /// The Next.js data global exists.
    pub next_data: bool,
    /// The host identifies itself as React Native.
    pub react_native: bool,
}

impl EnvironmentMarkers {
    /// Markers of a plain browser tab.
    #[must_use]
    pub const fn browser() -> Self {
        Self {
            window: true,
            document: true,
            next_data: false,
            react_native: false,
        }
    }

    /// Markers of the browser side of a Next.js application.
    #[must_use]
    pub const fn nextjs_browser() -> Self {
        Self {
            next_data: true,
            ..Self::browser()
        }
    }

    /// Markers of a React Native bundle.
    #[must_use]
    pub const fn react_native() -> Self {
        Self {
            window: false,
            document: false,
            next_data: false,
            react_native: true,
        }
    }
}

/// Everything the host exposes to the adapters.
#[derive(Clone, Default)]
pub struct HostEnvironment {
    markers: EnvironmentMarkers,
    local_storage: Option<Arc<dyn KeyValueStore>>,
    web_crypto: Option<Arc<dyn SecureCryptoApi>>,
    native_fetch: Option<Arc<dyn HttpTransport>>,
    async_storage: Option<SharedLoader<Arc<dyn AsyncKeyValueStore>>>,
    node_crypto: Option<SharedLoader<Arc<dyn SecureCryptoApi>>>,
    node_fs: Option<SharedLoader<()>>,
    alternate_fetch: Option<SharedLoader<Arc<dyn HttpTransport>>>,
    fetch_polyfill: Option<SharedLoader<Arc<dyn HttpTransport>>>,
}

impl HostEnvironment {
    /// An environment with no markers and no capabilities.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Describes the current native process: a server-side host with OS
    /// randomness, filesystem access and a `reqwest` transport.
    #[must_use]
    pub fn native() -> Self {
        let env = Self::empty()
            .with_node_crypto(|| Ok(Arc::new(OsCrypto)))
            .with_node_fs(|| {
                std::env::current_dir()
                    .map(|_| ())
                    .map_err(|err| LoadError::new("node-fs", err.to_string()))
            });

        #[cfg(not(target_arch = "wasm32"))]
        let env = env.with_native_fetch(Arc::new(crate::network::ReqwestTransport::new()));

        env
    }

    /// Sets the environment markers.
    #[must_use]
    pub const fn with_markers(mut self, markers: EnvironmentMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Registers durable browser storage.
    #[must_use]
    pub fn with_local_storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.local_storage = Some(store);
        self
    }

    /// Registers the `WebCrypto` API.
    #[must_use]
    pub fn with_web_crypto(mut self, api: Arc<dyn SecureCryptoApi>) -> Self {
        self.web_crypto = Some(api);
        self
    }

    /// Registers a globally available `fetch`.
    #[must_use]
    pub fn with_native_fetch(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.native_fetch = Some(transport);
        self
    }

    /// Registers a loader for the React Native storage module.
    #[must_use]
    pub fn with_async_storage<F>(self, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AsyncKeyValueStore>, LoadError> + Send + Sync + 'static,
    {
        self.with_async_storage_loader(Arc::new(loader))
    }

    /// Registers an asynchronous loader for the React Native storage module.
    #[must_use]
    pub fn with_async_storage_loader(
        mut self,
        loader: SharedLoader<Arc<dyn AsyncKeyValueStore>>,
    ) -> Self {
        self.async_storage = Some(loader);
        self
    }

    /// Registers a loader for the server-side crypto module.
    #[must_use]
    pub fn with_node_crypto<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SecureCryptoApi>, LoadError> + Send + Sync + 'static,
    {
        self.node_crypto = Some(Arc::new(loader));
        self
    }

    /// Registers a loader for the server-side filesystem module.
    #[must_use]
    pub fn with_node_fs<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<(), LoadError> + Send + Sync + 'static,
    {
        self.node_fs = Some(Arc::new(loader));
        self
    }

    /// Registers a loader for an alternate `fetch` implementation.
    #[must_use]
    pub fn with_alternate_fetch<F>(self, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn HttpTransport>, LoadError> + Send + Sync + 'static,
    {
        self.with_alternate_fetch_loader(Arc::new(loader))
    }

    /// Registers an asynchronous loader for an alternate `fetch` implementation.
    #[must_use]
    pub fn with_alternate_fetch_loader(
        mut self,
        loader: SharedLoader<Arc<dyn HttpTransport>>,
    ) -> Self {
        self.alternate_fetch = Some(loader);
        self
    }

    /// Registers a loader for the browser `fetch` polyfill.
    #[must_use]
    pub fn with_fetch_polyfill<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn HttpTransport>, LoadError> + Send + Sync + 'static,
    {
        self.fetch_polyfill = Some(Arc::new(loader));
        self
    }

    /// The environment markers.
    #[must_use]
    pub const fn markers(&self) -> EnvironmentMarkers {
        self.markers
    }

    /// The durable browser storage, if the host exposes one.
    #[must_use]
    pub fn local_storage(&self) -> Option<&Arc<dyn KeyValueStore>> {
        self.local_storage.as_ref()
    }

    /// The `WebCrypto` API, if the host exposes one.
    #[must_use]
    pub fn web_crypto(&self) -> Option<&Arc<dyn SecureCryptoApi>> {
        self.web_crypto.as_ref()
    }

    /// The global `fetch`, if the host exposes one.
    #[must_use]
    pub fn native_fetch(&self) -> Option<&Arc<dyn HttpTransport>> {
        self.native_fetch.as_ref()
    }

    pub(crate) async fn load_async_storage(
        &self,
    ) -> Result<Arc<dyn AsyncKeyValueStore>, LoadError> {
        load(self.async_storage.as_ref(), "async-storage").await
    }

    pub(crate) async fn load_node_crypto(
        &self,
    ) -> Result<Arc<dyn SecureCryptoApi>, LoadError> {
        load(self.node_crypto.as_ref(), "node-crypto").await
    }

    pub(crate) async fn load_node_fs(&self) -> Result<(), LoadError> {
        load(self.node_fs.as_ref(), "node-fs").await
    }

    pub(crate) async fn load_alternate_fetch(
        &self,
    ) -> Result<Arc<dyn HttpTransport>, LoadError> {
        load(self.alternate_fetch.as_ref(), "alternate-fetch").await
    }

    pub(crate) async fn load_fetch_polyfill(
        &self,
    ) -> Result<Arc<dyn HttpTransport>, LoadError> {
        load(self.fetch_polyfill.as_ref(), "fetch-polyfill").await
    }
}

async fn load<T>(
    loader: Option<&SharedLoader<T>>,
    module: &str,
) -> Result<T, LoadError> {
    match loader {
        Some(loader) => loader.load().await,
        None => Err(LoadError::new(module, "not registered")),
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("markers", &self.markers)
            .field("local_storage", &self.local_storage.is_some())
            .field("web_crypto", &self.web_crypto.is_some())
            .field("native_fetch", &self.native_fetch.is_some())
            .field("async_storage", &self.async_storage.is_some())
            .field("node_crypto", &self.node_crypto.is_some())
            .field("node_fs", &self.node_fs.is_some())
            .field("alternate_fetch", &self.alternate_fetch.is_some())
            .field("fetch_polyfill", &self.fetch_polyfill.is_some())
            .finish()
    }
}
