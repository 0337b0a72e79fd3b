use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use super::{random_buffer, CryptoAdapter, CryptoKind, SHA256_LEN};
use crate::{Platform, PlatformError, PlatformResult};

/// Fallback adapter: a time-seeded PRNG and software SHA-256.
///
/// **NOT SECURE.** Random bytes from this adapter are predictable and must
/// never be used for keys, nonces or secrets.
pub struct InsecureCrypto {
    rng: Mutex<StdRng>,
}

impl InsecureCrypto {
    /// Creates the fallback adapter and logs a warning naming `platform`.
    #[must_use]
    pub fn new(platform: Platform, forced: bool) -> Self {
        if forced {
            log::warn!("Insecure crypto forced for platform {platform}; do not use for secrets");
        } else {
            log::warn!(
                "No secure crypto available for platform {platform}, falling back to insecure crypto"
            );
        }
        Self::with_seed(time_seed())
    }

    /// Creates the fallback adapter with a fixed seed, without logging.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()).rotate_left(32)
        })
}

#[async_trait]
impl CryptoAdapter for InsecureCrypto {
    fn generate_random_bytes(&self, size: usize) -> PlatformResult<Vec<u8>> {
        let mut bytes = random_buffer(size)?;
        self.rng
            .lock()
            .map_err(|err| PlatformError::Crypto(format!("prng lock poisoned: {err}")))?
            .fill_bytes(&mut bytes);
        Ok(bytes)
    }

    async fn sha256(&self, data: &[u8]) -> PlatformResult<[u8; SHA256_LEN]> {
        Ok(Sha256::digest(data).into())
    }

    fn kind(&self) -> CryptoKind {
        CryptoKind::Insecure
    }
}
