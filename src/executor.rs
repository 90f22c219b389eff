//! Resilient request execution
//!
//! One logical call = up to `max_retries + 1` physical attempts, strictly
//! sequential, all under a single deadline of `timeout_ms` measured from
//! the first attempt:
//!
//! ```text
//! attempt ──2xx──────────────────────────────▶ decode ─▶ Ok / Decode error
//!    │
//!    ├─ retryable status / network failure ─┬─ budget left ─▶ sleep(delay) ─▶ attempt
//!    │                                      └─ exhausted ───▶ HttpRequest / Network error
//!    └─ other status ───────────────────────────────────────▶ HttpRequest error
//!
//! deadline elapses anywhere above ──────────────────────────▶ Timeout error
//! ```
//!
//! Backoff is deterministic (no jitter). Application-level errors inside a
//! 2xx body are passed through to the caller untouched.

use crate::config::RetryPolicy;
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Applies a [`RetryPolicy`] on top of a [`Transport`]
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `request` and decode the 2xx body as `T`.
    ///
    /// An empty body decodes as JSON `null`.
    #[instrument(
        skip(self, request),
        fields(method = %request.method, url = %request.url, call_id = %uuid::Uuid::new_v4())
    )]
    pub async fn execute<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T> {
        let response = self.execute_raw(request).await?;
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            warn!("Undecodable response body: {}", e);
            Error::decode(&request.url, e.to_string())
        })
    }

    /// Execute `request` with retries, returning the successful response
    pub async fn execute_raw(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let timeout_ms = self.policy.timeout_ms;
        match tokio::time::timeout(self.policy.timeout(), self.attempt_loop(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Call abandoned after {}ms deadline", timeout_ms);
                Err(Error::timeout(
                    format!("{} {} did not complete in time", request.method, request.url),
                    timeout_ms,
                ))
            }
        }
    }

    async fn attempt_loop(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut retries = 0u32;

        loop {
            debug!(attempt = retries + 1, "sending request");

            let failure = match self.transport.send(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    let retryable = self.policy.is_retryable_status(response.status);
                    let err = http_error(request, response);
                    if !retryable {
                        debug!("Non-retryable failure: {}", err);
                        return Err(err);
                    }
                    err
                }
                Err(e) => Error::network(e.message, request.url.clone()),
            };

            if retries >= self.policy.max_retries {
                warn!(
                    "Giving up after {} attempt(s): {}",
                    retries + 1,
                    failure
                );
                return Err(failure);
            }

            retries += 1;
            let delay = self.policy.delay_for_retry(retries);
            warn!(
                "Request failed (attempt {}/{}), retrying after {:?}: {}",
                retries,
                self.policy.max_retries + 1,
                delay,
                failure
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn http_error(request: &HttpRequest, response: HttpResponse) -> Error {
    Error::HttpRequest {
        status: response.status,
        status_text: response.status_text,
        url: request.url.clone(),
        body: response.body,
    }
}
