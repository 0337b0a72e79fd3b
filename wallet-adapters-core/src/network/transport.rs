use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{PlatformError, PlatformResult};

/// A request handed to an [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// Response returned by every network adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl NetworkResponse {
    /// Creates a response. Header names are stored lowercase.
    #[must_use]
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            body: body.into(),
        }
    }

    /// A `200` response with a JSON body.
    #[must_use]
    pub fn json_ok(body: impl Into<Vec<u8>>) -> Self {
        let headers = BTreeMap::from([(
            "content-type".to_string(),
            "application/json".to_string(),
        )]);
        Self::new(200, headers, body)
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the `2xx` range.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Looks up a header, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Serialization`] if the body is not UTF-8.
    pub fn text(&self) -> PlatformResult<String> {
        String::from_utf8(self.body.clone())
            .map_err(|err| PlatformError::Serialization(err.to_string()))
    }

    /// Body decoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Serialization`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> PlatformResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Failure of a single transport attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{error}")]
pub struct TransportError {
    /// HTTP status, if one was received.
    pub status: Option<u16>,
    /// Description of the failure.
    pub error: String,
    /// Whether retrying may succeed.
    pub retryable: bool,
}

impl TransportError {
    /// A transient failure (connect error, transport timeout).
    #[must_use]
    pub fn retryable(status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            retryable: true,
        }
    }

    /// A failure that retrying will not fix.
    #[must_use]
    pub fn permanent(status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            retryable: false,
        }
    }

    pub(crate) fn into_platform_error(self, url: &str) -> PlatformError {
        PlatformError::Network {
            url: url.to_string(),
            status: self.status,
            error: self.error,
        }
    }
}

/// An HTTP `fetch` implementation.
///
/// Implementations return any received response, whatever its status; only
/// failures to obtain a response are errors. Cancellation happens by dropping
/// the returned future.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn send(&self, request: HttpRequest) -> Result<NetworkResponse, TransportError>;
}
