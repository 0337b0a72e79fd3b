//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wallet_adapters_core::environment::{AsyncKeyValueStore, KeyValueStore};
use wallet_adapters_core::{
    HttpTransport, NetworkResponse, StorageError, StorageResult,
};
use wallet_adapters_core::network::{HttpRequest, TransportError};

/// Routes `log` records from the crate into a `tracing` subscriber.
///
/// Set `RUST_LOG=wallet_adapters_core=debug` to see adapter selection.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Browser `localStorage` stand-in.
#[derive(Default)]
pub struct InMemoryLocalStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for InMemoryLocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// `localStorage` that throws on every call, as in some private browsing modes.
pub struct RejectingLocalStorage;

impl KeyValueStore for RejectingLocalStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Store("SecurityError".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Store("QuotaExceededError".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Store("SecurityError".to_string()))
    }
}

/// React Native `AsyncStorage` stand-in.
#[derive(Default)]
pub struct InMemoryAsyncStorage {
    entries: tokio::sync::Mutex<HashMap<String, String>>,
}

#[async_trait]
impl AsyncKeyValueStore for InMemoryAsyncStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// A `fetch` that never settles.
pub struct HangingTransport;

#[async_trait]
impl HttpTransport for HangingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<NetworkResponse, TransportError> {
        std::future::pending().await
    }
}

pub fn hanging_transport() -> Arc<dyn HttpTransport> {
    Arc::new(HangingTransport)
}
