#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Platform adapters for the wallet UI library.
//!
//! Detects what the host runtime (`web`, `nextjs` or `react-native`) can do and
//! assembles a storage, crypto and network adapter behind one asynchronous
//! contract.
//!
//! ```rust,no_run
//! # async fn run() {
//! use wallet_adapters_core::get_default_platform_adapter;
//!
//! let adapter = get_default_platform_adapter().await;
//! adapter.storage.set_item("theme", "dark").await;
//! let digest = adapter.crypto.sha256(b"hello").await;
//! # let _ = digest;
//! # }
//! ```

mod platform;
pub use platform::*;

mod error;
pub use error::*;

pub mod degraded;
pub use degraded::{Degraded, Outcome};

pub mod config;
pub use config::{AdapterOptions, CryptoOptions, NetworkOptions};

pub mod environment;
pub use environment::{EnvironmentMarkers, HostEnvironment, ModuleLoader};

pub mod detect;
pub use detect::{detect_features, detect_platform, FeatureOverrides, FeatureSet};

pub mod storage;
pub use storage::{create_storage_adapter, StorageAdapter, StorageKind};

pub mod crypto;
pub use crypto::{create_crypto_adapter, CryptoAdapter, CryptoKind};

pub mod network;
pub use network::{
    create_network_adapter, HttpTransport, NetworkAdapter, NetworkKind,
    NetworkResponse, RequestOptions,
};

mod adapter;
pub use adapter::*;

pub mod logger;

#[cfg(test)]
pub(crate) mod test_support;

uniffi::setup_scaffolding!("wallet_adapters_core");
