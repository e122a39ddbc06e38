use crate::client::core::InterpretationClient;
use crate::client::endpoint::resolve_endpoint;
use crate::client::RetryPolicy;
use crate::config::{
    non_blank, ClientConfig, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL, DEFAULT_URL_TEMPLATE,
};
use crate::transport::{HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Builder for [`InterpretationClient`].
///
/// Starts from an empty configuration; use [`InterpretationClientBuilder::from_env`] to seed it
/// from environment variables and override individual settings afterwards.
#[derive(Debug, Default)]
pub struct InterpretationClientBuilder {
    config: ClientConfig,
    cancel: Option<CancellationToken>,
}

impl InterpretationClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from the process environment.
    pub fn from_env() -> Self {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Explicit URL for the primary endpoint; takes precedence over the model id.
    pub fn primary_url(mut self, url: impl Into<String>) -> Self {
        self.config.primary.url = Some(url.into());
        self
    }

    pub fn primary_model(mut self, model: impl Into<String>) -> Self {
        self.config.primary.model = Some(model.into());
        self
    }

    /// Explicit URL for the fallback endpoint; takes precedence over the model id.
    pub fn fallback_url(mut self, url: impl Into<String>) -> Self {
        self.config.fallback.url = Some(url.into());
        self
    }

    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.config.fallback.model = Some(model.into());
        self
    }

    /// URL template containing a `{model}` placeholder.
    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.config.url_template = Some(template.into());
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn transport_config(mut self, transport: TransportConfig) -> Self {
        self.config.transport = transport;
        self
    }

    /// Token that aborts calls waiting between attempts. Cancelling it affects every call
    /// made through the client; use
    /// [`InterpretationClient::get_interpretation_with_cancel`] for per-call control.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate the configuration, resolve both endpoints and open the connection pool.
    pub fn build(self) -> Result<InterpretationClient> {
        let config = self.config;

        let api_key = non_blank(config.api_key).ok_or_else(|| {
            Error::configuration_with_context(
                "API key is missing or blank",
                ErrorContext::new()
                    .with_field_path("GEMINI_API_KEY")
                    .with_source("client_builder"),
            )
        })?;

        let template = non_blank(config.url_template)
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        let primary = resolve_endpoint(&config.primary, &template, DEFAULT_PRIMARY_MODEL, false)?;
        let fallback =
            resolve_endpoint(&config.fallback, &template, DEFAULT_FALLBACK_MODEL, true)?;

        let transport = HttpTransport::new(api_key, &config.transport)?;

        info!(
            primary = primary.url(),
            fallback = fallback.url(),
            max_attempts = config.retry.max_attempts,
            "interpretation client ready"
        );

        Ok(InterpretationClient {
            transport,
            primary,
            fallback,
            policy: config.retry,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}
