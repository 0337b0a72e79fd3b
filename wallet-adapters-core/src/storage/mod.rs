//! Key/value storage adapters.
//!
//! Storage is best-effort UI state (selected theme, cached balances, dismissed
//! banners), not a source of truth. Adapters therefore never surface errors:
//! each backend reports failures as [`Degraded`](crate::Degraded) outcomes and
//! [`BestEffortStorage`] collapses them into `None` or a no-op plus a warning.
//!
//! # Backends
//!
//! - [`DurableStorage`]: browser `localStorage`
//! - [`ReactNativeStorage`]: React Native `AsyncStorage`
//! - [`MemoryStorage`]: non-persistent fallback

mod durable;
mod memory;
mod react_native;

use std::sync::Arc;

use async_trait::async_trait;

pub use durable::DurableStorage;
pub use memory::MemoryStorage;
pub use react_native::ReactNativeStorage;

use crate::degraded::{Collapse, Outcome};
use crate::detect::FeatureSet;
use crate::environment::HostEnvironment;
use crate::Platform;

/// Which backend a storage adapter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Durable browser storage.
    Durable,
    /// React Native persistent storage.
    ReactNative,
    /// In-memory, lost with the adapter.
    Memory,
}

/// Asynchronous key/value storage that never fails to its callers.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Returns the value for `key`, or `None` if it is missing or unreadable.
    async fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`. A failed write leaves the previous value intact.
    async fn set_item(&self, key: &str, value: &str);

    /// Removes `key`.
    async fn remove_item(&self, key: &str);

    /// The backend in use.
    fn kind(&self) -> StorageKind;
}

/// A storage backend that reports failures as degradations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads `key`.
    async fn try_get_item(&self, key: &str) -> Outcome<Option<String>>;

    /// Writes `value` under `key`.
    async fn try_set_item(&self, key: &str, value: &str) -> Outcome<()>;

    /// Removes `key`.
    async fn try_remove_item(&self, key: &str) -> Outcome<()>;

    /// The backend kind.
    fn kind(&self) -> StorageKind;
}

/// Collapses a [`StorageBackend`] into a [`StorageAdapter`].
#[derive(Debug)]
pub struct BestEffortStorage<B> {
    backend: B,
}

impl<B: StorageBackend> BestEffortStorage<B> {
    /// Wraps `backend`.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend, for inspecting degradations directly.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: StorageBackend> StorageAdapter for BestEffortStorage<B> {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.backend.try_get_item(key).await.or_degrade(None)
    }

    async fn set_item(&self, key: &str, value: &str) {
        self.backend.try_set_item(key, value).await.or_degrade(());
    }

    async fn remove_item(&self, key: &str) {
        self.backend.try_remove_item(key).await.or_degrade(());
    }

    fn kind(&self) -> StorageKind {
        self.backend.kind()
    }
}

/// Selects the storage backend for `platform`.
///
/// React Native storage wins on `react-native` when its module loads; durable
/// browser storage wins on `web` and `nextjs` when usable. Everything else gets
/// the memory fallback, announced with a single warning.
pub async fn create_storage_adapter(
    platform: Platform,
    features: &FeatureSet,
    env: &HostEnvironment,
) -> Arc<dyn StorageAdapter> {
    if platform == Platform::ReactNative && features.async_storage {
        match env.load_async_storage().await {
            Ok(store) => {
                log::debug!("Using React Native storage");
                return Arc::new(BestEffortStorage::new(ReactNativeStorage::new(store)));
            }
            Err(err) => log::debug!("React Native storage failed to load: {err}"),
        }
    }

    if platform.is_browser_like() && features.local_storage {
        if let Some(store) = env.local_storage() {
            log::debug!("Using durable browser storage");
            return Arc::new(BestEffortStorage::new(DurableStorage::new(Arc::clone(
                store,
            ))));
        }
    }

    log::warn!(
        "No persistent storage available for platform {platform}, falling back to in-memory storage"
    );
    Arc::new(BestEffortStorage::new(MemoryStorage::new()))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::environment::EnvironmentMarkers;
    use crate::test_support::{FakeAsyncStorage, FakeLocalStorage, LogCapture};
    use crate::{detect_features, LoadError};

    fn full_env() -> HostEnvironment {
        HostEnvironment::empty()
            .with_local_storage(Arc::new(FakeLocalStorage::default()))
            .with_async_storage(|| Ok(Arc::new(FakeAsyncStorage::default())))
    }

    #[test_case(Platform::Web, StorageKind::Durable)]
    #[test_case(Platform::Nextjs, StorageKind::Durable)]
    #[test_case(Platform::ReactNative, StorageKind::ReactNative)]
    #[tokio::test]
    async fn test_selection_priority(platform: Platform, expected: StorageKind) {
        let env = full_env();
        let features = detect_features(&env).await;
        let storage = create_storage_adapter(platform, &features, &env).await;
        assert_eq!(storage.kind(), expected);
    }

    #[tokio::test]
    async fn test_react_native_without_modules_falls_back_to_memory() {
        let env = HostEnvironment::empty().with_markers(EnvironmentMarkers::react_native());
        let features = detect_features(&env).await;

        let logs = LogCapture::start();
        let storage = create_storage_adapter(Platform::ReactNative, &features, &env).await;
        assert_eq!(storage.kind(), StorageKind::Memory);
        assert_eq!(logs.warnings(), 1);
        assert!(logs.messages().iter().any(|m| m.contains("react-native")));

        storage.set_item("wallet", "0xabc").await;
        assert_eq!(storage.get_item("wallet").await.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn test_react_native_load_failure_falls_through() {
        let env = HostEnvironment::empty()
            .with_async_storage(|| Err(LoadError::new("async-storage", "native module missing")));
        // Forced on, but the module still fails when actually loaded.
        let features = FeatureSet {
            async_storage: true,
            ..FeatureSet::default()
        };
        let storage = create_storage_adapter(Platform::ReactNative, &features, &env).await;
        assert_eq!(storage.kind(), StorageKind::Memory);
    }

    #[tokio::test]
    async fn test_local_storage_is_ignored_on_react_native() {
        let env = HostEnvironment::empty()
            .with_local_storage(Arc::new(FakeLocalStorage::default()));
        let features = detect_features(&env).await;
        let storage = create_storage_adapter(Platform::ReactNative, &features, &env).await;
        assert_eq!(storage.kind(), StorageKind::Memory);
    }

    #[tokio::test]
    async fn test_unusable_local_storage_is_skipped() {
        let env = HostEnvironment::empty()
            .with_local_storage(Arc::new(FakeLocalStorage::failing()));
        let features = detect_features(&env).await;
        let storage = create_storage_adapter(Platform::Web, &features, &env).await;
        assert_eq!(storage.kind(), StorageKind::Memory);
    }

    #[tokio::test]
    async fn test_failing_backend_never_surfaces_errors() {
        let storage = BestEffortStorage::new(DurableStorage::new(Arc::new(
            FakeLocalStorage::failing(),
        )));
        let logs = LogCapture::start();
        storage.set_item("k", "v").await;
        assert_eq!(storage.get_item("k").await, None);
        storage.remove_item("k").await;
        assert_eq!(logs.warnings(), 3);

        let degraded = storage.backend().try_get_item("k").await.unwrap_err();
        assert_eq!(degraded.operation, "storage.get_item");
    }

    #[tokio::test]
    async fn test_round_trip_and_remove_for_every_backend() {
        let backends: Vec<Arc<dyn StorageAdapter>> = vec![
            Arc::new(BestEffortStorage::new(DurableStorage::new(Arc::new(
                FakeLocalStorage::default(),
            )))),
            Arc::new(BestEffortStorage::new(ReactNativeStorage::new(Arc::new(
                FakeAsyncStorage::default(),
            )))),
            Arc::new(BestEffortStorage::new(MemoryStorage::new())),
        ];
        for storage in backends {
            storage.set_item("session", "{\"connected\":true}").await;
            assert_eq!(
                storage.get_item("session").await.as_deref(),
                Some("{\"connected\":true}"),
                "{:?}",
                storage.kind()
            );
            storage.remove_item("session").await;
            assert_eq!(storage.get_item("session").await, None, "{:?}", storage.kind());
        }
    }
}
