use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::AdapterOptions;
use crate::crypto::{create_crypto_adapter, CryptoAdapter};
use crate::detect::{detect_features, detect_platform, FeatureOverrides, FeatureSet};
use crate::environment::HostEnvironment;
use crate::network::{create_network_adapter, NetworkAdapter};
use crate::storage::{create_storage_adapter, StorageAdapter};
use crate::Platform;

/// The storage, crypto and network adapters for one host.
///
/// All three were selected for the same `platform` and `features`. A bundle
/// never changes after construction.
pub struct PlatformAdapter {
    /// The platform the bundle was built for.
    pub platform: Platform,
    /// The capabilities detected (and possibly overridden) at construction.
    pub features: FeatureSet,
    /// Key/value storage.
    pub storage: Arc<dyn StorageAdapter>,
    /// Randomness and hashing.
    pub crypto: Arc<dyn CryptoAdapter>,
    /// HTTP access.
    pub network: Arc<dyn NetworkAdapter>,
}

impl fmt::Debug for PlatformAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformAdapter")
            .field("platform", &self.platform)
            .field("features", &self.features)
            .field("storage", &self.storage.kind())
            .field("crypto", &self.crypto.kind())
            .field("network", &self.network.kind())
            .finish()
    }
}

/// Options for [`create_custom_platform_adapter`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomAdapterOptions {
    /// Forced feature values, applied after detection.
    pub features: FeatureOverrides,
    /// Options for the individual factories.
    #[serde(flatten)]
    pub options: AdapterOptions,
}

/// Builds a bundle for the current native process with default options.
pub async fn create_platform_adapter() -> PlatformAdapter {
    create_platform_adapter_with(&HostEnvironment::native(), &AdapterOptions::default()).await
}

/// Builds a bundle for `env`, detecting its platform.
pub async fn create_platform_adapter_with(
    env: &HostEnvironment,
    options: &AdapterOptions,
) -> PlatformAdapter {
    let platform = detect_platform(env);
    let features = detect_features(env).await;
    assemble(platform, features, env, options).await
}

/// Builds a bundle for an explicit `platform`.
///
/// Features are still probed from `env`; `options.features` then forces
/// individual values, e.g. to disable durable storage in a private session.
pub async fn create_custom_platform_adapter(
    platform: Platform,
    env: &HostEnvironment,
    options: &CustomAdapterOptions,
) -> PlatformAdapter {
    let features = options.features.apply(detect_features(env).await);
    assemble(platform, features, env, &options.options).await
}

async fn assemble(
    platform: Platform,
    features: FeatureSet,
    env: &HostEnvironment,
    options: &AdapterOptions,
) -> PlatformAdapter {
    let storage = create_storage_adapter(platform, &features, env).await;
    let crypto = create_crypto_adapter(platform, &features, env, &options.crypto).await;
    let network = create_network_adapter(platform, &features, env, &options.network).await;

    let adapter = PlatformAdapter {
        platform,
        features,
        storage,
        crypto,
        network,
    };
    log::debug!("Created platform adapter: {adapter:?}");
    adapter
}

/// Lazily builds one bundle and hands out the same instance afterwards.
///
/// Concurrent first calls to [`AdapterRegistry::get_or_create`] build the
/// bundle once; every caller receives the same `Arc`.
#[derive(Debug)]
pub struct AdapterRegistry {
    env: HostEnvironment,
    options: AdapterOptions,
    adapter: OnceCell<Arc<PlatformAdapter>>,
}

impl AdapterRegistry {
    /// Creates a registry that will build its bundle from `env` and `options`.
    #[must_use]
    pub fn new(env: HostEnvironment, options: AdapterOptions) -> Self {
        Self {
            env,
            options,
            adapter: OnceCell::new(),
        }
    }

    /// Returns the bundle, building it on first use.
    pub async fn get_or_create(&self) -> Arc<PlatformAdapter> {
        let adapter = self
            .adapter
            .get_or_init(|| async {
                Arc::new(create_platform_adapter_with(&self.env, &self.options).await)
            })
            .await;
        Arc::clone(adapter)
    }

    /// Returns the bundle if it has been built.
    #[must_use]
    pub fn get(&self) -> Option<Arc<PlatformAdapter>> {
        self.adapter.get().cloned()
    }
}

static DEFAULT_REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();

/// Returns the process-wide bundle for the native host, building it on first use.
pub async fn get_default_platform_adapter() -> Arc<PlatformAdapter> {
    DEFAULT_REGISTRY
        .get_or_init(|| AdapterRegistry::new(HostEnvironment::native(), AdapterOptions::default()))
        .get_or_create()
        .await
}
