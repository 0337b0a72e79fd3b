use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use super::transport::{HttpRequest, HttpTransport, NetworkResponse, TransportError};

/// [`HttpTransport`] backed by a `reqwest` client.
///
/// This is the native `fetch` of a Rust host. Timeouts and retries are applied
/// by the network adapter wrapping it, not here.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn user_agent() -> String {
    format!("wallet-adapters-core/{}", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<NetworkResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .header(USER_AGENT, user_agent());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let (client, request) = builder.build_split();
        let request = request.map_err(|err| {
            TransportError::permanent(None, format!("request build failed: {err}"))
        })?;

        let response = client.execute(request).await.map_err(|err| {
            if is_transient(&err) {
                TransportError::retryable(None, format!("request timeout/connect error: {err}"))
            } else {
                TransportError::permanent(None, format!("request failed: {err}"))
            }
        })?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|err| {
            TransportError::retryable(Some(status), format!("reading body failed: {err}"))
        })?;

        Ok(NetworkResponse::new(status, headers, body.to_vec()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout()
}
