//! API client for the published election-results mirror.
//!
//! `ApiClient` owns the transport and the retry policy. It knows nothing
//! about the cache; see [`CachedFetcher`](crate::fetcher::CachedFetcher).

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use super::retry::RetryPolicy;
use super::transport::{ReqwestTransport, Transport, Validators};
use crate::error::{PipelineError, Result};

/// Result of a single logical GET (after retries).
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched { value: Value, validators: Validators },
    /// Only produced for conditional requests.
    NotModified,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client backed by reqwest.
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(Arc::new(transport), base_url, retry))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Absolute URL for a path relative to the base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `url` and parse the body as JSON, retrying gateway errors.
    pub async fn get_json(&self, url: &str, conditional: Option<&Validators>) -> Result<FetchOutcome> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let response = self.transport.get(url, conditional).await?;
            let status = response.status;

            if self.retry.is_retryable(status) {
                if attempt >= self.retry.max_attempts {
                    warn!(url = url, status = %status, attempts = attempt, "Retries exhausted");
                    return Err(PipelineError::TransientFetch {
                        url: url.to_string(),
                        status,
                        attempts: attempt,
                    });
                }
                let backoff = self.retry.backoff_before(attempt);
                warn!(
                    url = url,
                    status = %status,
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Gateway error, backing off"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            if status == StatusCode::NOT_MODIFIED && conditional.is_some() {
                debug!(url = url, "Not modified");
                return Ok(FetchOutcome::NotModified);
            }

            if !status.is_success() {
                return Err(PipelineError::from_status(url, status, &response.body));
            }

            let value: Value = serde_json::from_str(&response.body)
                .map_err(|e| PipelineError::decode(url, e))?;

            if attempt > 1 {
                debug!(url = url, attempts = attempt, "Succeeded after retry");
            }
            return Ok(FetchOutcome::Fetched {
                value,
                validators: response.validators,
            });
        }
    }
}
