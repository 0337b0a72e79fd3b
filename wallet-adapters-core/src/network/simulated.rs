use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::Method;

use super::{NetworkAdapter, NetworkKind, NetworkResponse, RequestOptions};
use crate::{PlatformError, PlatformResult};

const EMPTY_OBJECT: &str = "{}";

/// In-memory stand-in for a server, keyed by URL.
///
/// `GET` returns what was last stored under the URL (or `{}`), `POST` and
/// `PUT` store the body and echo it, `DELETE` clears the URL. Nothing ever
/// leaves the process, so this must not be used in production.
#[derive(Debug, Default)]
pub struct SimulatedNetwork {
    responses: RwLock<HashMap<String, String>>,
}

impl SimulatedNetwork {
    /// Creates an empty simulation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error<G>(url: &str) -> impl FnOnce(PoisonError<G>) -> PlatformError + '_ {
        move |_| PlatformError::Network {
            url: url.to_string(),
            status: None,
            error: "simulated network lock poisoned".to_string(),
        }
    }
}

#[async_trait]
impl NetworkAdapter for SimulatedNetwork {
    async fn fetch(&self, url: &str, options: RequestOptions) -> PlatformResult<NetworkResponse> {
        let response = match options.method {
            Method::GET => {
                let responses = self.responses.read().map_err(Self::lock_error(url))?;
                let body = responses.get(url).map_or(EMPTY_OBJECT, String::as_str);
                NetworkResponse::json_ok(body)
            }
            Method::POST | Method::PUT => {
                let body = options.body.unwrap_or_else(|| EMPTY_OBJECT.to_string());
                self.responses
                    .write()
                    .map_err(Self::lock_error(url))?
                    .insert(url.to_string(), body.clone());
                NetworkResponse::json_ok(body)
            }
            Method::DELETE => {
                self.responses
                    .write()
                    .map_err(Self::lock_error(url))?
                    .remove(url);
                NetworkResponse::json_ok(EMPTY_OBJECT)
            }
            Method::HEAD => NetworkResponse::new(200, BTreeMap::new(), Vec::new()),
            _ => NetworkResponse::new(405, BTreeMap::new(), Vec::new()),
        };
        Ok(response)
    }

    async fn is_network_available(&self) -> bool {
        true
    }

    fn kind(&self) -> NetworkKind {
        NetworkKind::Simulated
    }
}
