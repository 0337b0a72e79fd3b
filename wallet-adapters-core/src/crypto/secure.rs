use std::sync::Arc;

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use super::{
    into_digest, random_buffer, CryptoAdapter, CryptoKind, MAX_RANDOM_CHUNK, SHA256_ALGORITHM,
    SHA256_LEN,
};
use crate::environment::SecureCryptoApi;
use crate::{PlatformError, PlatformResult};

/// Adapter over a platform-native [`SecureCryptoApi`].
pub struct SecureCrypto {
    api: Arc<dyn SecureCryptoApi>,
}

impl SecureCrypto {
    /// Wraps `api`.
    #[must_use]
    pub fn new(api: Arc<dyn SecureCryptoApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CryptoAdapter for SecureCrypto {
    fn generate_random_bytes(&self, size: usize) -> PlatformResult<Vec<u8>> {
        let mut bytes = random_buffer(size)?;
        for chunk in bytes.chunks_mut(MAX_RANDOM_CHUNK) {
            self.api.fill_random(chunk)?;
        }
        Ok(bytes)
    }

    async fn sha256(&self, data: &[u8]) -> PlatformResult<[u8; SHA256_LEN]> {
        let digest = self.api.digest(SHA256_ALGORITHM, data).await?;
        into_digest(&digest)
    }

    fn kind(&self) -> CryptoKind {
        CryptoKind::Secure
    }
}

/// The operating system's secure random source with SHA-256.
///
/// This is what a native process exposes as its server-side crypto module.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCrypto;

#[async_trait]
impl SecureCryptoApi for OsCrypto {
    fn fill_random(&self, dest: &mut [u8]) -> PlatformResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|err| PlatformError::Crypto(format!("OS random source failed: {err}")))
    }

    async fn digest(&self, algorithm: &str, data: &[u8]) -> PlatformResult<Vec<u8>> {
        if algorithm != SHA256_ALGORITHM {
            return Err(PlatformError::InvalidInput {
                attribute: "algorithm".to_string(),
                reason: format!("unsupported digest algorithm {algorithm}"),
            });
        }
        Ok(Sha256::digest(data).to_vec())
    }
}
