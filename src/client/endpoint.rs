//! Endpoint resolution.

use crate::config::EndpointConfig;
use crate::{Error, ErrorContext, Result};

const MODEL_PLACEHOLDER: &str = "{model}";

/// A fully resolved remote URL the client can call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
    is_fallback: bool,
}

impl Endpoint {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub(crate) fn label(&self) -> &'static str {
        if self.is_fallback {
            "fallback"
        } else {
            "primary"
        }
    }
}

/// Resolve one endpoint slot.
///
/// Precedence: explicit URL > template + configured model > template + `default_model`.
pub(crate) fn resolve_endpoint(
    slot: &EndpointConfig,
    url_template: &str,
    default_model: &str,
    is_fallback: bool,
) -> Result<Endpoint> {
    let slot_name = if is_fallback { "fallback" } else { "primary" };

    let url = match slot.url.as_deref() {
        Some(url) => url.trim().to_string(),
        None => {
            let model = slot.model.as_deref().unwrap_or(default_model).trim();
            if model.is_empty() {
                return Err(Error::configuration_with_context(
                    format!("{} model identifier is blank", slot_name),
                    ErrorContext::new()
                        .with_field_path(format!("{}.model", slot_name))
                        .with_source("endpoint_resolver"),
                ));
            }
            if !url_template.contains(MODEL_PLACEHOLDER) {
                return Err(Error::configuration_with_context(
                    format!("URL template has no {} placeholder", MODEL_PLACEHOLDER),
                    ErrorContext::new()
                        .with_field_path("url_template")
                        .with_details(url_template.to_string())
                        .with_source("endpoint_resolver"),
                ));
            }
            url_template.replace(MODEL_PLACEHOLDER, model)
        }
    };

    validate_url(&url, slot_name)?;
    Ok(Endpoint { url, is_fallback })
}

fn validate_url(url: &str, slot_name: &str) -> Result<()> {
    let ctx = || {
        ErrorContext::new()
            .with_field_path(format!("{}.url", slot_name))
            .with_details(url.to_string())
            .with_source("endpoint_resolver")
    };

    if url.is_empty() {
        return Err(Error::configuration_with_context(
            format!("{} endpoint URL is blank", slot_name),
            ctx(),
        ));
    }
    let parsed = url::Url::parse(url).map_err(|e| {
        Error::configuration_with_context(
            format!("{} endpoint URL is invalid: {}", slot_name, e),
            ctx(),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("{} endpoint URL must be http or https", slot_name),
            ctx(),
        ));
    }
    Ok(())
}
