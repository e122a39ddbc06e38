use crate::Result;
use arc_swap::ArcSwapOption;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Timeouts and pool settings for the underlying `reqwest::Client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bound on TCP/TLS connection establishment.
    pub connect_timeout: Duration,
    /// Bound on the whole exchange: writing the request and reading the full body.
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 4,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Defaults, overridden by `TAROT_HTTP_CONNECT_TIMEOUT_SECS` and `TAROT_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    /// Unparseable or zero values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };
        Self {
            connect_timeout: secs("TAROT_HTTP_CONNECT_TIMEOUT_SECS", defaults.connect_timeout),
            request_timeout: secs("TAROT_HTTP_TIMEOUT_SECS", defaults.request_timeout),
            ..defaults
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Pooled HTTP transport that can be closed from a shared reference.
///
/// The pool lives behind an `ArcSwapOption`; `close` swaps it out and drops it, which shuts
/// down idle connections. Calls made after that fail with [`TransportError::ClientClosed`].
pub struct HttpTransport {
    client: ArcSwapOption<reqwest::Client>,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: impl Into<String>, config: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout))
            .build()
            .map_err(pool_build_error)?;

        Ok(Self {
            client: ArcSwapOption::from_pointee(client),
            api_key: api_key.into(),
        })
    }

    /// POST a JSON body to `url?key=<api key>` and read the full response body.
    ///
    /// Any status is returned as an [`HttpReply`]; only transport-level failures are errors.
    pub async fn post_json(&self, url: &str, body: Bytes) -> Result<HttpReply> {
        let client: Arc<reqwest::Client> = self
            .client
            .load_full()
            .ok_or(TransportError::ClientClosed)?;

        let response = client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await
            .map_err(redacted)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(redacted)?;
        Ok(HttpReply { status, body })
    }

    /// Release the connection pool. Returns `true` if this call released it.
    pub fn close(&self) -> bool {
        let released = self.client.swap(None).is_some();
        if released {
            debug!("http transport closed, connection pool released");
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.client.load().is_none()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("closed", &self.is_closed())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The request URL carries the API key in its query string; errors must never keep it.
fn redacted(e: reqwest::Error) -> TransportError {
    TransportError::Http(e.without_url())
}

/// A pool that cannot be created is a setup fault, not a failed call.
fn pool_build_error(e: impl std::fmt::Display) -> crate::Error {
    crate::Error::configuration_with_context(
        format!("cannot create HTTP client: {}", e),
        crate::ErrorContext::new()
            .with_field_path("transport")
            .with_source("http_transport"),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}{}", timeout_suffix(.0))]
    Http(#[from] reqwest::Error),

    #[error("HTTP client already closed")]
    ClientClosed,
}

fn timeout_suffix(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        " (timed out)"
    } else {
        ""
    }
}
