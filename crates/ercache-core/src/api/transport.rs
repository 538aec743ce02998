//! HTTP transport seam.
//!
//! `ApiClient` talks to the network only through [`Transport`], so the retry
//! loop and the cache can be driven by a scripted transport in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Cache validators echoed back by the server and replayed on revalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl Validators {
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// The parts of an HTTP response the pipeline cares about.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub validators: Validators,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            validators: Validators::default(),
            body: body.into(),
        }
    }

    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.validators.last_modified = Some(value.into());
        self
    }

    pub fn with_etag(mut self, value: impl Into<String>) -> Self {
        self.validators.etag = Some(value.into());
        self
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single GET. `conditional` validators, when present, are sent as
    /// `If-None-Match` / `If-Modified-Since`.
    async fn get(&self, url: &str, conditional: Option<&Validators>) -> Result<HttpResponse>;
}

/// Production transport backed by a shared `reqwest::Client`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ercache/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn header_string(headers: &header::HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, conditional: Option<&Validators>) -> Result<HttpResponse> {
        let mut request = self.client.get(url).header(header::ACCEPT, "application/json");
        if let Some(validators) = conditional {
            if let Some(ref etag) = validators.etag {
                request = request.header(header::IF_NONE_MATCH, etag);
            }
            if let Some(ref last_modified) = validators.last_modified {
                request = request.header(header::IF_MODIFIED_SINCE, last_modified);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let validators = Validators {
            etag: header_string(response.headers(), header::ETAG),
            last_modified: header_string(response.headers(), header::LAST_MODIFIED),
        };
        let body = response.text().await?;
        debug!(url = url, status = %status, bytes = body.len(), "GET complete");

        Ok(HttpResponse {
            status,
            validators,
            body,
        })
    }
}
