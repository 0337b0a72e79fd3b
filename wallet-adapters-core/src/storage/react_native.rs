use std::sync::Arc;

use async_trait::async_trait;

use super::{StorageBackend, StorageKind};
use crate::degraded::{Degraded, Outcome};
use crate::environment::AsyncKeyValueStore;

/// Backend over the React Native persistent storage module.
pub struct ReactNativeStorage {
    store: Arc<dyn AsyncKeyValueStore>,
}

impl ReactNativeStorage {
    /// Wraps the loaded module.
    #[must_use]
    pub fn new(store: Arc<dyn AsyncKeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageBackend for ReactNativeStorage {
    async fn try_get_item(&self, key: &str) -> Outcome<Option<String>> {
        self.store
            .get_item(key)
            .await
            .map_err(Degraded::storage("storage.get_item"))
    }

    async fn try_set_item(&self, key: &str, value: &str) -> Outcome<()> {
        self.store
            .set_item(key, value)
            .await
            .map_err(Degraded::storage("storage.set_item"))
    }

    async fn try_remove_item(&self, key: &str) -> Outcome<()> {
        self.store
            .remove_item(key)
            .await
            .map_err(Degraded::storage("storage.remove_item"))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::ReactNative
    }
}
