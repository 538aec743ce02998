//! Fetch-or-load over the API client and the JSON cache.
//!
//! A cached entry short-circuits the network entirely under
//! [`CacheValidity::Trusted`]. Under [`CacheValidity::Revalidate`] an entry
//! carrying an `ETag` or `Last-Modified` is checked with a conditional GET.
//! Every network round trip is followed by a fixed delay to stay polite to
//! the mirror.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ApiClient, FetchOutcome};
use crate::cache::{CacheKey, CachedData, JsonCache, SourceInfo};
use crate::error::Result;

/// Pause after each network fetch.
pub const DEFAULT_FETCH_DELAY_MS: u64 = 500;

/// How a present cache entry is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheValidity {
    /// Presence on disk means valid; no network access.
    #[default]
    Trusted,
    /// Revalidate entries that carry validators; trust the rest.
    Revalidate,
}

pub struct CachedFetcher<C: JsonCache> {
    api: ApiClient,
    cache: C,
    validity: CacheValidity,
    fetch_delay: Duration,
}

impl<C: JsonCache> CachedFetcher<C> {
    pub fn new(api: ApiClient, cache: C) -> Self {
        Self {
            api,
            cache,
            validity: CacheValidity::default(),
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
        }
    }

    pub fn with_validity(mut self, validity: CacheValidity) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetch a document by its path relative to the API base. The path is
    /// also its cache key.
    pub async fn fetch_path(&self, path: &str, label: Option<&str>) -> Result<Value> {
        let key = CacheKey::from_remote_path(path);
        let url = self.api.url_for(key.as_str());
        self.fetch_or_load(&key, &url, label).await
    }

    pub async fn fetch_or_load(&self, key: &CacheKey, url: &str, label: Option<&str>) -> Result<Value> {
        let cached = self.cache.get(key)?;

        let conditional = match cached {
            Some(entry) => {
                let revalidate = self.validity == CacheValidity::Revalidate
                    && !entry.source.validators.is_empty();
                if !revalidate {
                    debug!(key = %key, age = %entry.age_display(), "Cache hit");
                    return Ok(entry.data);
                }
                Some(entry)
            }
            None => None,
        };

        let outcome = self
            .api
            .get_json(url, conditional.as_ref().map(|e| &e.source.validators))
            .await?;
        let value = match outcome {
            FetchOutcome::Fetched { value, validators } => {
                let source = SourceInfo {
                    url: url.to_string(),
                    label: label.map(|l| l.to_string()),
                    validators,
                };
                let entry = CachedData::new(value, source);
                self.cache.put(key, &entry)?;
                info!(key = %key, label = label.unwrap_or(""), "Downloaded");
                entry.data
            }
            // The client only reports 304 for conditional requests
            FetchOutcome::NotModified => {
                debug!(key = %key, "Revalidated");
                conditional.map(|entry| entry.data).unwrap_or(Value::Null)
            }
        };

        tokio::time::sleep(self.fetch_delay).await;
        Ok(value)
    }
}
