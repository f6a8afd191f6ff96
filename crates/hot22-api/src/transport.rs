// Shared transport configuration for building reqwest::Client instances.
//
// Timeout, default JSON headers, and the dev-mode traffic logging flag
// live here so the request path in `client.rs` stays focused on mechanics.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::Error;

const USER_AGENT: &str = concat!("hot22-dashboard/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Applied uniformly to every request. Expiry maps to [`Error::Timeout`].
    pub timeout: Duration,
    /// Log request/response metadata at `info` instead of `debug`.
    pub dev_mode: bool,
    /// Extra headers sent with every request.
    pub default_headers: HeaderMap,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            dev_mode: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// JSON `Content-Type` and `Accept` headers are installed as defaults;
    /// multipart uploads override the content type per request.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::InvalidRequest(format!("failed to build HTTP client: {e}")))
    }
}
