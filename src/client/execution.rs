//! 请求执行逻辑：单一端点的单次尝试与有界重试。
//!
//! Request execution against one endpoint: a single attempt, and the bounded retry loop
//! around it.

use crate::types::{extract_interpretation_text, parse_response};
use crate::{Error, Result};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::core::InterpretationClient;
use super::endpoint::Endpoint;

impl InterpretationClient {
    /// Run the bounded retry loop against `endpoint` and return the last error if every
    /// attempt fails. Backoff waits end early when either `cancel` or the client token fires.
    pub(crate) async fn call_endpoint(
        &self,
        endpoint: &Endpoint,
        body: &Bytes,
        request_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let mut attempt = 1u32;
        loop {
            let err = match self.attempt_once(endpoint, body.clone(), request_id, attempt).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };

            if !self.policy.should_retry(attempt, &err) {
                return Err(err);
            }

            let delay = self.policy.backoff_duration(attempt);
            warn!(
                request_id,
                endpoint = endpoint.label(),
                attempt,
                http_status = err.status(),
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, retrying"
            );

            tokio::select! {
                biased;
                _ = self.cancelled(cancel) => {
                    return Err(Error::cancelled(format!(
                        "cancelled while waiting to retry the {} endpoint after attempt {}",
                        endpoint.label(),
                        attempt
                    )));
                }
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    /// Resolves once either the caller's token or the client's own token fires.
    pub(crate) async fn cancelled(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = self.cancel.cancelled() => {}
        }
    }

    pub(crate) fn is_cancelled(&self, cancel: &CancellationToken) -> bool {
        cancel.is_cancelled() || self.cancel.is_cancelled()
    }

    /// One HTTP exchange: POST, check status and body, decode and extract the text.
    async fn attempt_once(
        &self,
        endpoint: &Endpoint,
        body: Bytes,
        request_id: &str,
        attempt: u32,
    ) -> Result<String> {
        let start = std::time::Instant::now();
        let reply = self.transport.post_json(endpoint.url(), body).await?;

        debug!(
            request_id,
            endpoint = endpoint.label(),
            attempt,
            http_status = reply.status,
            duration_ms = start.elapsed().as_millis() as u64,
            "attempt completed"
        );

        if !reply.is_success() {
            return Err(Error::Remote {
                status: reply.status,
                body: reply.body,
            });
        }
        if reply.body.trim().is_empty() {
            return Err(Error::EmptyBody {
                status: reply.status,
            });
        }

        let response = parse_response(&reply.body)?;
        if let Some(reason) = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(request_id, finish_reason = reason, "candidate finish reason");
        }
        extract_interpretation_text(&response).map(str::to_owned)
    }
}
