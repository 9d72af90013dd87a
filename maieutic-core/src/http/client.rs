//! Shared HTTP client implementation using reqwest

use crate::config::ConfigError;
use crate::http::{error::map_status, REQUEST_TIMEOUT_SECS};
use crate::providers::error::{ProviderError, ProviderResult};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default user agent
const USER_AGENT: &str = concat!("maieutic/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling.
///
/// Cloning is cheap; all clones share one connection pool. The per-request
/// timeout doubles as the per-attempt timeout of the retry loop.
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings.
    ///
    /// Failure here is a construction-time configuration problem (e.g. no TLS
    /// backend), never a per-call one.
    pub fn new() -> Result<Self, ConfigError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// POST a JSON body and return the parsed JSON response.
    ///
    /// Non-success statuses are mapped into the provider taxonomy; `backend`
    /// is used for log correlation only. Header values must never contain
    /// credentials that should be logged, and this method never logs them.
    pub async fn post_json(
        &self,
        backend: &str,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> ProviderResult<Value> {
        debug!(backend, url, "sending generation request");

        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(*name, value.as_str());
        }

        let response = req_builder.send().await.map_err(|e| {
            warn!(backend, error = %e, "transport failure");
            ProviderError::from(e)
        })?;

        let status = response.status();
        debug!(backend, status = status.as_u16(), "received response");

        if !status.is_success() {
            let body_text = response.text().await.ok();
            warn!(backend, status = status.as_u16(), "request failed");
            return Err(map_status(status, body_text.as_deref()));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read response body: {}", e)))?;

        serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::Parse(format!("invalid response body: {}", e)))
    }
}
