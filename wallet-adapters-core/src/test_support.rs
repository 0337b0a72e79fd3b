//! Test helpers shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use crate::environment::{AsyncKeyValueStore, KeyValueStore};
use crate::logger::{set_logger, LogLevel, Logger};
use crate::{StorageError, StorageResult};

thread_local! {
    static CAPTURED: RefCell<Option<Vec<(LogLevel, String)>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Logger for CaptureLogger {
    fn log(&self, level: LogLevel, message: String) {
        CAPTURED.with(|captured| {
            if let Some(records) = captured.borrow_mut().as_mut() {
                records.push((level, message));
            }
        });
    }
}

/// Captures log records emitted on the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so async tests see every
/// record their futures emit.
pub struct LogCapture;

impl LogCapture {
    pub fn start() -> Self {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| set_logger(Arc::new(CaptureLogger)));
        CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
        Self
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        CAPTURED.with(|captured| captured.borrow().clone().unwrap_or_default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|(_, message)| message).collect()
    }

    pub fn warnings(&self) -> usize {
        self.records()
            .iter()
            .filter(|(level, _)| *level == LogLevel::Warn)
            .count()
    }
}

impl Drop for LogCapture {
    fn drop(&mut self) {
        CAPTURED.with(|captured| *captured.borrow_mut() = None);
    }
}

/// `localStorage` stand-in that can be told to reject every call.
#[derive(Default)]
pub struct FakeLocalStorage {
    entries: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl FakeLocalStorage {
    pub fn failing() -> Self {
        Self {
            entries: Mutex::default(),
            failing: true,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing {
            return Err(StorageError::Store("SecurityError: access denied".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for FakeLocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// `AsyncStorage` stand-in.
#[derive(Default)]
pub struct FakeAsyncStorage {
    entries: tokio::sync::Mutex<HashMap<String, String>>,
    failing: bool,
}

impl FakeAsyncStorage {
    pub fn failing() -> Self {
        Self {
            entries: tokio::sync::Mutex::default(),
            failing: true,
        }
    }
}

#[async_trait]
impl AsyncKeyValueStore for FakeAsyncStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.failing {
            return Err(StorageError::Store("AsyncStorage read failed".to_string()));
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.failing {
            return Err(StorageError::Store("AsyncStorage write failed".to_string()));
        }
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        if self.failing {
            return Err(StorageError::Store("AsyncStorage remove failed".to_string()));
        }
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
