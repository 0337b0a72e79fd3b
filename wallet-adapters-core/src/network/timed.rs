use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Method;

use super::transport::{HttpRequest, HttpTransport, NetworkResponse, TransportError};
use super::{NetworkAdapter, NetworkKind, RequestOptions};
use crate::config::{NetworkOptions, PROBE_TIMEOUT};
use crate::{PlatformError, PlatformResult};

/// Network adapter over a real transport.
///
/// Every request, retries included, races against the configured timeout.
/// When the timeout wins the in-flight request future is dropped, which
/// aborts it, and a [`PlatformError::Timeout`] naming the duration and URL is
/// returned.
pub struct TimedNetwork {
    transport: Arc<dyn HttpTransport>,
    kind: NetworkKind,
    timeout: Duration,
    max_retries: u32,
    probe_url: String,
}

/// Why an attempt should (or should not) be retried.
#[derive(Debug)]
enum AttemptError {
    Transport(TransportError),
    /// A response was received but its status is transient (429, 5xx).
    Status(NetworkResponse),
}

impl AttemptError {
    const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.retryable,
            Self::Status(_) => true,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl TimedNetwork {
    /// Wraps `transport` using the timeout, retry and probe settings of `options`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        kind: NetworkKind,
        options: &NetworkOptions,
    ) -> Self {
        Self {
            transport,
            kind,
            timeout: options.timeout,
            max_retries: options.max_retries,
            probe_url: options.probe_url.clone(),
        }
    }

    async fn attempt(&self, request: HttpRequest) -> Result<NetworkResponse, AttemptError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(AttemptError::Transport)?;
        if is_transient_status(response.status()) {
            return Err(AttemptError::Status(response));
        }
        Ok(response)
    }

    async fn send_with_retries(&self, request: HttpRequest) -> PlatformResult<NetworkResponse> {
        let url = request.url.clone();

        let outcome = if self.max_retries == 0 {
            self.attempt(request).await
        } else {
            let backoff = ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_delay(Duration::from_secs(2))
                .with_max_times(self.max_retries as usize);

            (|| async { self.attempt(request.clone()).await })
                .retry(backoff)
                .when(|err: &AttemptError| err.is_retryable())
                .notify(|err: &AttemptError, delay: Duration| {
                    log::debug!("Retrying {url} in {delay:?} after {err:?}");
                })
                .await
        };

        match outcome {
            Ok(response) | Err(AttemptError::Status(response)) => Ok(response),
            Err(AttemptError::Transport(err)) => Err(err.into_platform_error(&url)),
        }
    }
}

#[async_trait]
impl NetworkAdapter for TimedNetwork {
    async fn fetch(&self, url: &str, options: RequestOptions) -> PlatformResult<NetworkResponse> {
        let timeout = options.timeout.unwrap_or(self.timeout);
        let request = options.into_request(url);

        tokio::time::timeout(timeout, self.send_with_retries(request))
            .await
            .map_err(|_| PlatformError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis(),
            })?
    }

    async fn is_network_available(&self) -> bool {
        let request = HttpRequest::new(Method::HEAD, self.probe_url.as_str());
        let probe = self.transport.send(request);
        match tokio::time::timeout(self.timeout.min(PROBE_TIMEOUT), probe).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                log::debug!("Network probe to {} failed: {err}", self.probe_url);
                false
            }
            Err(_) => {
                log::debug!("Network probe to {} timed out", self.probe_url);
                false
            }
        }
    }

    fn kind(&self) -> NetworkKind {
        self.kind
    }
}
