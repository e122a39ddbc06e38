//! 配置：从环境变量解析 API 金钥、端点与逾时设定。
//!
//! Client configuration resolved once at startup.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GEMINI_API_KEY` | API key (required) |
//! | `GEMINI_API_URL` / `GEMINI_MODEL` | primary endpoint URL override / model id |
//! | `GEMINI_FALLBACK_API_URL` / `GEMINI_FALLBACK_MODEL` | fallback endpoint URL override / model id |
//! | `GEMINI_URL_TEMPLATE` | URL template with a `{model}` placeholder |
//! | `TAROT_HTTP_CONNECT_TIMEOUT_SECS` / `TAROT_HTTP_TIMEOUT_SECS` | transport timeouts |
//!
//! Blank values count as unset.

use crate::client::RetryPolicy;
use crate::transport::TransportConfig;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash-lite";

/// Overrides for one endpoint slot. An explicit `url` wins over `model`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub model: Option<String>,
}

/// Everything needed to construct an [`InterpretationClient`](crate::InterpretationClient).
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub url_template: Option<String>,
    pub primary: EndpointConfig,
    pub fallback: EndpointConfig,
    pub transport: TransportConfig,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_blank(lookup(name));
        Self {
            api_key: get("GEMINI_API_KEY"),
            url_template: get("GEMINI_URL_TEMPLATE"),
            primary: EndpointConfig {
                url: get("GEMINI_API_URL"),
                model: get("GEMINI_MODEL"),
            },
            fallback: EndpointConfig {
                url: get("GEMINI_FALLBACK_API_URL"),
                model: get("GEMINI_FALLBACK_MODEL"),
            },
            transport: TransportConfig::from_lookup(&lookup),
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("url_template", &self.url_template)
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .field("transport", &self.transport)
            .field("retry", &self.retry)
            .finish()
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
