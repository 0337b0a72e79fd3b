use async_trait::async_trait;

use super::{NetworkAdapter, NetworkKind, NetworkResponse, RequestOptions};
use crate::{Platform, PlatformError, PlatformResult};

/// Adapter used when the platform offers no HTTP transport.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableNetwork {
    platform: Platform,
}

impl UnavailableNetwork {
    /// Creates the adapter for `platform`.
    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl NetworkAdapter for UnavailableNetwork {
    async fn fetch(&self, _url: &str, _options: RequestOptions) -> PlatformResult<NetworkResponse> {
        Err(PlatformError::FetchUnavailable {
            platform: self.platform,
        })
    }

    async fn is_network_available(&self) -> bool {
        false
    }

    fn kind(&self) -> NetworkKind {
        NetworkKind::Unavailable
    }
}
