//! Random bytes and SHA-256.
//!
//! An adapter is bound to one source for its whole lifetime: a secure adapter
//! whose primitive fails returns an error, it never falls back to the insecure
//! source mid-session. Both variants return the same shapes (`n` random bytes,
//! 32-byte digests).

mod insecure;
mod secure;

use std::sync::Arc;

use async_trait::async_trait;

pub use insecure::InsecureCrypto;
pub use secure::{OsCrypto, SecureCrypto};

use crate::config::CryptoOptions;
use crate::detect::FeatureSet;
use crate::environment::HostEnvironment;
use crate::{Platform, PlatformError, PlatformResult};

/// Length of a SHA-256 digest in bytes.
pub const SHA256_LEN: usize = 32;

/// Algorithm identifier passed to secure digest primitives.
pub const SHA256_ALGORITHM: &str = "SHA-256";

/// Largest buffer handed to a secure random primitive in one call
/// (the `WebCrypto` `getRandomValues` quota).
pub const MAX_RANDOM_CHUNK: usize = 65_536;

/// Which source a crypto adapter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoKind {
    /// Platform-native secure primitives.
    Secure,
    /// Non-cryptographic PRNG and software SHA-256. Never for key material.
    Insecure,
}

/// Randomness and hashing for the wallet UI.
#[async_trait]
pub trait CryptoAdapter: Send + Sync {
    /// Returns exactly `size` random bytes. `size == 0` yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidInput`] if a buffer of `size` bytes
    /// cannot be allocated, or an error if the underlying random source fails.
    fn generate_random_bytes(&self, size: usize) -> PlatformResult<Vec<u8>>;

    /// Returns the SHA-256 digest of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the digest primitive fails or returns a digest of
    /// the wrong length.
    async fn sha256(&self, data: &[u8]) -> PlatformResult<[u8; SHA256_LEN]>;

    /// The source in use.
    fn kind(&self) -> CryptoKind;
}

/// Selects the crypto source for a bundle.
///
/// Unless `options.use_insecure_crypto` is set, `WebCrypto` is preferred, then
/// the server-side crypto module. Otherwise the insecure fallback is used and
/// announced with a single warning.
pub async fn create_crypto_adapter(
    platform: Platform,
    features: &FeatureSet,
    env: &HostEnvironment,
    options: &CryptoOptions,
) -> Arc<dyn CryptoAdapter> {
    if !options.use_insecure_crypto {
        if features.web_crypto {
            if let Some(api) = env.web_crypto() {
                log::debug!("Using WebCrypto");
                return Arc::new(SecureCrypto::new(Arc::clone(api)));
            }
        }
        if features.node_crypto {
            match env.load_node_crypto().await {
                Ok(api) => {
                    log::debug!("Using server-side crypto module");
                    return Arc::new(SecureCrypto::new(api));
                }
                Err(err) => log::debug!("Server-side crypto module failed to load: {err}"),
            }
        }
    }

    Arc::new(InsecureCrypto::new(platform, options.use_insecure_crypto))
}

/// Allocates the zeroed output buffer for `size` random bytes.
///
/// Sizes the allocator cannot satisfy are rejected instead of aborting.
pub(crate) fn random_buffer(size: usize) -> PlatformResult<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size)
        .map_err(|err| PlatformError::InvalidInput {
            attribute: "size".to_string(),
            reason: format!("cannot allocate {size} random bytes: {err}"),
        })?;
    bytes.resize(size, 0);
    Ok(bytes)
}

/// Checks the digest shape returned by a primitive.
pub(crate) fn into_digest(digest: &[u8]) -> PlatformResult<[u8; SHA256_LEN]> {
    <[u8; SHA256_LEN]>::try_from(digest).map_err(|_| {
        PlatformError::Crypto(format!(
            "{SHA256_ALGORITHM} digest has {} bytes, expected {SHA256_LEN}",
            digest.len()
        ))
    })
}
