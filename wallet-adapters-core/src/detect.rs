//! Runtime platform and feature detection.
//!
//! Every probe runs in isolation: an error inside one probe reports that
//! capability as absent and never affects the other probes. Panics are caught
//! the same way when the crate is built with `panic = "unwind"` (the default
//! for tests and debug builds); under `panic = "abort"` a panicking host
//! capability still aborts the process.

use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::environment::HostEnvironment;
use crate::Platform;

const PROBE_KEY: &str = "__wallet_adapters_probe__";

/// Optional capabilities found in the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Durable browser storage exists and accepts a write/read round-trip.
    pub local_storage: bool,
    /// `WebCrypto` exposes both secure random and digest entry points.
    pub web_crypto: bool,
    /// The React Native storage module loads.
    pub async_storage: bool,
    /// The server-side crypto module loads (never in browser contexts).
    pub node_crypto: bool,
    /// The server-side filesystem module loads (never in browser contexts).
    pub node_fs: bool,
    /// An alternate `fetch` implementation loads.
    pub alternate_fetch: bool,
}

/// Forced values applied on top of a probed [`FeatureSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeatureOverrides {
    /// Overrides [`FeatureSet::local_storage`].
    pub local_storage: Option<bool>,
    /// Overrides [`FeatureSet::web_crypto`].
    pub web_crypto: Option<bool>,
    /// Overrides [`FeatureSet::async_storage`].
    pub async_storage: Option<bool>,
    /// Overrides [`FeatureSet::node_crypto`].
    pub node_crypto: Option<bool>,
    /// Overrides [`FeatureSet::node_fs`].
    pub node_fs: Option<bool>,
    /// Overrides [`FeatureSet::alternate_fetch`].
    pub alternate_fetch: Option<bool>,
}

impl FeatureOverrides {
    /// Applies the forced values to `features`.
    #[must_use]
    pub fn apply(&self, features: FeatureSet) -> FeatureSet {
        FeatureSet {
            local_storage: self.local_storage.unwrap_or(features.local_storage),
            web_crypto: self.web_crypto.unwrap_or(features.web_crypto),
            async_storage: self.async_storage.unwrap_or(features.async_storage),
            node_crypto: self.node_crypto.unwrap_or(features.node_crypto),
            node_fs: self.node_fs.unwrap_or(features.node_fs),
            alternate_fetch: self.alternate_fetch.unwrap_or(features.alternate_fetch),
        }
    }
}

/// Determines the host platform from the environment markers.
///
/// Browser DOM markers win, with the Next.js data global telling `nextjs`
/// apart from `web`. React Native comes next. Anything else is treated as the
/// generic server-side case and reported as `nextjs`.
#[must_use]
pub fn detect_platform(env: &HostEnvironment) -> Platform {
    let markers = env.markers();
    if markers.window && markers.document {
        if markers.next_data {
            return Platform::Nextjs;
        }
        return Platform::Web;
    }
    if markers.react_native {
        return Platform::ReactNative;
    }
    Platform::Nextjs
}

/// Probes every optional capability of `env`.
pub async fn detect_features(env: &HostEnvironment) -> FeatureSet {
    let local_storage = probe("local_storage", || local_storage_works(env));
    let web_crypto = probe("web_crypto", || {
        env.web_crypto()
            .is_some_and(|api| api.supports_random_values() && api.supports_digest())
    });
    let async_storage =
        probe_async("async_storage", env.load_async_storage().map(|r| r.is_ok())).await;

    // Server-side modules are never used from a browser-like context.
    let browser_like = env.markers().window;
    let node_crypto = !browser_like
        && probe_async("node_crypto", env.load_node_crypto().map(|r| r.is_ok())).await;
    let node_fs =
        !browser_like && probe_async("node_fs", env.load_node_fs().map(|r| r.is_ok())).await;

    let alternate_fetch =
        probe_async("alternate_fetch", env.load_alternate_fetch().map(|r| r.is_ok())).await;

    let features = FeatureSet {
        local_storage,
        web_crypto,
        async_storage,
        node_crypto,
        node_fs,
        alternate_fetch,
    };
    log::debug!("Detected features: {features:?}");
    features
}

fn local_storage_works(env: &HostEnvironment) -> bool {
    let Some(store) = env.local_storage() else {
        return false;
    };
    let round_trip = store
        .set(PROBE_KEY, PROBE_KEY)
        .and_then(|()| store.get(PROBE_KEY))
        .and_then(|value| store.remove(PROBE_KEY).map(|()| value));
    match round_trip {
        Ok(value) => value.as_deref() == Some(PROBE_KEY),
        Err(err) => {
            log::debug!("localStorage present but unusable: {err}");
            false
        }
    }
}

fn probe(name: &str, check: impl FnOnce() -> bool) -> bool {
    panic::catch_unwind(AssertUnwindSafe(check)).unwrap_or_else(|_| {
        log::debug!("Feature probe {name} panicked");
        false
    })
}

async fn probe_async(name: &str, check: impl std::future::Future<Output = bool>) -> bool {
    AssertUnwindSafe(check).catch_unwind().await.unwrap_or_else(|_| {
        log::debug!("Feature probe {name} panicked");
        false
    })
}
