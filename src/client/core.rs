use crate::client::endpoint::Endpoint;
use crate::client::policy::RetryPolicy;
use crate::client::validation::validate_prompt;
use crate::transport::HttpTransport;
use crate::types::GenerateContentRequest;
use crate::{Error, Result};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Client that turns a finished prompt into an interpretation.
///
/// Each call tries the primary endpoint under the retry policy and, if that gives up on a
/// transient failure, the fallback endpoint under the same policy. The connection pool is
/// released by [`close`](Self::close) or when the client is dropped.
#[derive(Debug)]
pub struct InterpretationClient {
    pub(crate) transport: HttpTransport,
    pub(crate) primary: Endpoint,
    pub(crate) fallback: Endpoint,
    pub(crate) policy: RetryPolicy,
    pub(crate) cancel: CancellationToken,
}

impl InterpretationClient {
    /// Build a client from environment variables.
    pub fn from_env() -> Result<Self> {
        crate::client::builder::InterpretationClientBuilder::from_env().build()
    }

    pub fn primary(&self) -> &Endpoint {
        &self.primary
    }

    pub fn fallback(&self) -> &Endpoint {
        &self.fallback
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Token shared by every call on this client; cancelling it aborts pending backoff waits.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve an interpretation for `prompt`.
    pub async fn get_interpretation(&self, prompt: &str) -> Result<String> {
        let cancel = self.cancel.child_token();
        self.get_interpretation_with_cancel(prompt, &cancel).await
    }

    /// Like [`get_interpretation`](Self::get_interpretation), but also aborts when `cancel`
    /// fires during a backoff wait. The client token still applies.
    pub async fn get_interpretation_with_cancel(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        validate_prompt(prompt)?;
        if self.transport.is_closed() {
            return Err(crate::transport::TransportError::ClientClosed.into());
        }

        let request_id = Uuid::new_v4().to_string();
        let body = encode_request(prompt)?;
        let start = std::time::Instant::now();

        let primary_err = match self
            .call_endpoint(&self.primary, &body, &request_id, cancel)
            .await
        {
            Ok(text) => {
                info!(
                    request_id = request_id.as_str(),
                    endpoint = "primary",
                    duration_ms = start.elapsed().as_millis() as u64,
                    "interpretation received"
                );
                return Ok(text);
            }
            Err(e) => e,
        };

        if !self.policy.should_fallback(&primary_err) {
            return Err(primary_err);
        }
        if self.is_cancelled(cancel) {
            warn!(
                request_id = request_id.as_str(),
                error = %primary_err,
                "cancelled after primary endpoint failed, not trying fallback"
            );
            return Err(Error::cancelled(
                "cancelled before switching to the fallback endpoint",
            ));
        }

        // The caller only ever sees the fallback's error; keep the primary's in the log.
        warn!(
            request_id = request_id.as_str(),
            http_status = primary_err.status(),
            error = %primary_err,
            fallback = self.fallback.url(),
            "primary endpoint exhausted, switching to fallback"
        );

        let text = self
            .call_endpoint(&self.fallback, &body, &request_id, cancel)
            .await?;
        info!(
            request_id = request_id.as_str(),
            endpoint = "fallback",
            duration_ms = start.elapsed().as_millis() as u64,
            "interpretation received"
        );
        Ok(text)
    }

    /// Release the connection pool and abort anything waiting on this client.
    ///
    /// Safe to call any number of times.
    pub fn close(&self) {
        self.cancel.cancel();
        if self.transport.close() {
            info!("interpretation client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}

impl Drop for InterpretationClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn encode_request(prompt: &str) -> Result<Bytes> {
    let request = GenerateContentRequest::from_prompt(prompt);
    serde_json::to_vec(&request).map(Bytes::from).map_err(|e| {
        Error::invalid_input_with_context(
            format!("prompt could not be encoded: {}", e),
            crate::ErrorContext::new()
                .with_field_path("prompt")
                .with_source("request_encoder"),
        )
    })
}
