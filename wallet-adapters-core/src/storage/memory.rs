use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{StorageBackend, StorageKind};
use crate::degraded::{Degraded, Outcome};
use crate::StorageError;

/// Non-persistent backend backed by a `HashMap`.
///
/// Contents live exactly as long as the adapter.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. A poisoned store reports zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

fn poisoned<G>(operation: &'static str) -> impl FnOnce(PoisonError<G>) -> Degraded {
    move |err| Degraded::storage(operation)(StorageError::Lock(err.to_string()))
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn try_get_item(&self, key: &str) -> Outcome<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(poisoned("storage.get_item"))?;
        Ok(entries.get(key).cloned())
    }

    async fn try_set_item(&self, key: &str, value: &str) -> Outcome<()> {
        self.entries
            .write()
            .map_err(poisoned("storage.set_item"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn try_remove_item(&self, key: &str) -> Outcome<()> {
        self.entries
            .write()
            .map_err(poisoned("storage.remove_item"))?
            .remove(key);
        Ok(())
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}
