use std::sync::Arc;

use async_trait::async_trait;

use super::{StorageBackend, StorageKind};
use crate::degraded::{Degraded, Outcome};
use crate::environment::KeyValueStore;

/// Backend over the host's durable browser storage.
///
/// The store is owned by the host and outlives the adapter.
pub struct DurableStorage {
    store: Arc<dyn KeyValueStore>,
}

impl DurableStorage {
    /// Wraps the host store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageBackend for DurableStorage {
    async fn try_get_item(&self, key: &str) -> Outcome<Option<String>> {
        self.store
            .get(key)
            .map_err(Degraded::storage("storage.get_item"))
    }

    async fn try_set_item(&self, key: &str, value: &str) -> Outcome<()> {
        self.store
            .set(key, value)
            .map_err(Degraded::storage("storage.set_item"))
    }

    async fn try_remove_item(&self, key: &str) -> Outcome<()> {
        self.store
            .remove(key)
            .map_err(Degraded::storage("storage.remove_item"))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Durable
    }
}
