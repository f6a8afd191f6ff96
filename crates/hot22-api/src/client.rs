// HOT22 API HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, envelope unwrapping,
// error-body capture, and dev-mode traffic logging. Endpoint modules
// (offices, error logs, ...) are thin functions over the helpers here.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, ErrorClass};
use crate::models::unwrap_envelope;
use crate::params::QueryParams;
use crate::transport::TransportConfig;

// ── Paths ───────────────────────────────────────────────────────────

/// An API path built from static segments plus percent-encoded
/// dynamic segments (agent codes, upload ids, lookup values).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Append one dynamic segment. Slashes inside it are encoded.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Per-request overrides for [`ApiClient::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub params: QueryParams,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn with_params(params: QueryParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_body(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }
}

// ── Upload progress ─────────────────────────────────────────────────

/// `round(loaded * 100 / total)`, clamped to 100. An empty payload is
/// complete by definition.
pub fn percent_complete(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (u128::from(loaded) * 100 + u128::from(total) / 2) / u128::from(total);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

struct ProgressTracker {
    total: u64,
    loaded: AtomicU64,
    on_progress: Box<dyn Fn(u8) + Send + Sync>,
}

impl ProgressTracker {
    fn advance(&self, bytes: usize) {
        let delta = u64::try_from(bytes).unwrap_or(u64::MAX);
        let loaded = self.loaded.fetch_add(delta, Ordering::Relaxed) + delta;
        (self.on_progress)(percent_complete(loaded, self.total));
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client for the HOT22 back-office API.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
/// All helpers return unwrapped payloads; a `{ success, data }` wrapper is
/// stripped before deserialization.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    dev_mode: bool,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            timeout: transport.timeout,
            dev_mode: transport.dev_mode,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            timeout: TransportConfig::default().timeout,
            dev_mode: false,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidRequest(format!("base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&endpoint.segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Perform a request and return the raw response.
    ///
    /// Non-2xx statuses become [`Error::Http`] with the body attached;
    /// a missing response becomes [`Error::Network`] or [`Error::Timeout`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &Endpoint,
        options: RequestOptions,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(endpoint)?;
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .query(options.params.pairs())
            .headers(options.headers);
        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }
        self.dispatch(method, url, builder).await
    }

    /// GET and decode a JSON payload.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &QueryParams,
    ) -> Result<T, Error> {
        let resp = self
            .request(
                Method::GET,
                endpoint,
                RequestOptions::with_params(params.clone()),
            )
            .await?;
        decode(resp, self.timeout_secs()).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)
            .map_err(|e| Error::InvalidRequest(format!("unserializable body: {e}")))?;
        let resp = self
            .request(Method::POST, endpoint, RequestOptions::with_body(body))
            .await?;
        decode(resp, self.timeout_secs()).await
    }

    /// DELETE and decode the JSON response.
    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &QueryParams,
    ) -> Result<T, Error> {
        let resp = self
            .request(
                Method::DELETE,
                endpoint,
                RequestOptions::with_params(params.clone()),
            )
            .await?;
        decode(resp, self.timeout_secs()).await
    }

    /// Upload a file as `multipart/form-data`, reporting progress.
    ///
    /// `on_progress` receives `round(loaded * 100 / total)` after every
    /// chunk read from disk.
    pub async fn upload_file<T, F>(
        &self,
        endpoint: &Endpoint,
        file_path: &Path,
        field: &str,
        on_progress: F,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        F: Fn(u8) + Send + Sync + 'static,
    {
        let file = tokio::fs::File::open(file_path).await?;
        let total = file.metadata().await?.len();
        let file_name = file_path
            .file_name()
            .map_or_else(|| "upload.hot22".to_owned(), |n| n.to_string_lossy().into_owned());

        if total == 0 {
            on_progress(100);
        }
        let tracker = Arc::new(ProgressTracker {
            total,
            loaded: AtomicU64::new(0),
            on_progress: Box::new(on_progress),
        });

        let stream = ReaderStream::new(file).inspect(move |chunk| {
            if let Ok(bytes) = chunk {
                tracker.advance(bytes.len());
            }
        });
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| Error::InvalidRequest(format!("invalid upload part: {e}")))?;
        let form = Form::new().part(field.to_owned(), part);

        let url = self.url(endpoint)?;
        debug!(url = %url, bytes = total, "uploading file");
        let builder = self.http.post(url.clone()).multipart(form);
        let resp = self.dispatch(Method::POST, url, builder).await?;
        decode(resp, self.timeout_secs()).await
    }

    /// Fetch a binary payload and save it as `dest_dir/filename`.
    pub async fn download_file(
        &self,
        endpoint: &Endpoint,
        params: &QueryParams,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        let resp = self
            .request(
                Method::GET,
                endpoint,
                RequestOptions {
                    params: params.clone(),
                    body: None,
                    headers,
                },
            )
            .await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::from_transport(&e, self.timeout_secs()))?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let target = dest_dir.join(filename);
        tokio::fs::write(&target, &bytes).await?;
        debug!(path = %target.display(), bytes = bytes.len(), "download saved");
        Ok(target)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let started = Instant::now();
        if self.dev_mode {
            info!(%method, %url, "request");
        } else {
            debug!(%method, %url, "request");
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let err = Error::from_transport(&e, self.timeout_secs());
                warn!(%method, %url, error = %err, "network error: no response received");
                return Err(err);
            }
        };

        let status = resp.status();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if self.dev_mode {
            info!(%method, %url, status = status.as_u16(), elapsed_ms, "response");
        } else {
            debug!(%method, %url, status = status.as_u16(), elapsed_ms, "response");
        }

        if status.is_success() {
            return Ok(resp);
        }

        let err = http_error(resp).await;
        match err.classify() {
            ErrorClass::Unauthorized => warn!(%method, %url, "request rejected as unauthorized"),
            _ => warn!(%method, %url, error = %err, "request failed"),
        }
        Err(err)
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Build an [`Error::Http`], keeping a JSON body verbatim when present.
async fn http_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

    let message = body
        .as_ref()
        .and_then(|b| {
            b.get("message")
                .or_else(|| b.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .or_else(|| (!text.trim().is_empty() && body.is_none()).then(|| text.trim().to_owned()))
        .unwrap_or_else(|| reason(status));

    Error::Http {
        status: status.as_u16(),
        message,
        body,
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), str::to_owned)
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, timeout_secs: u64) -> Result<T, Error> {
    let body = resp
        .text()
        .await
        .map_err(|e| Error::from_transport(&e, timeout_secs))?;

    let value: serde_json::Value = if body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?
    };

    serde_json::from_value(unwrap_envelope(value)).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn percent_complete_rounds_half_up() {
        assert_eq!(percent_complete(0, 200), 0);
        assert_eq!(percent_complete(1, 200), 1);
        assert_eq!(percent_complete(199, 200), 100);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn url_keeps_base_prefix_and_encodes_segments() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://backoffice.local/hot22").unwrap(),
        );
        let url = client
            .url(&Endpoint::new("/api/lookup/ticket").segment("12/34 5"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://backoffice.local/hot22/api/lookup/ticket/12%2F34%205"
        );
    }

    #[test]
    fn endpoint_path_joins_segments() {
        let ep = Endpoint::new("api/offices/").segment("1234567");
        assert_eq!(ep.path(), "/api/offices/1234567");
    }
}
