//! Local on-disk cache of fetched API documents.
//!
//! This module provides the `JsonCache` abstraction and `CacheManager`, its
//! filesystem implementation. Entries are keyed by `CacheKey`, the path of
//! the remote document relative to the API base, so the directory layout
//! mirrors the remote one:
//!
//! - `data/regions/local/{code}.json`: the root region listing
//! - `data/regions/precinct/{shard}/{code}.json`: precinct documents
//! - `data/er/{shard}/{code}.json`: election returns
//!
//! Entries never expire. Whether an entry is trusted as-is or revalidated
//! against the server is decided by the fetcher, not the cache.

pub mod manager;

use std::fmt;

use serde_json::Value;

pub use manager::{CacheManager, CachedData, SourceInfo};

use crate::error::Result;

/// Canonical cache key: a relative, `/`-separated path ending in `.json`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a remote path. Leading slashes, empty segments and
    /// `.`/`..` segments are dropped so a key can never escape the cache root.
    pub fn from_remote_path(path: &str) -> Self {
        let cleaned: Vec<&str> = path
            .split('/')
            .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
            .collect();
        CacheKey(cleaned.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment without the `.json` extension.
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.strip_suffix(".json").unwrap_or(name)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_matches('/');
        prefix.is_empty() || self.0 == prefix || self.0.starts_with(&format!("{}/", prefix))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait JsonCache: Send + Sync {
    fn exists(&self, key: &CacheKey) -> bool;

    fn get(&self, key: &CacheKey) -> Result<Option<CachedData<Value>>>;

    fn put(&self, key: &CacheKey, entry: &CachedData<Value>) -> Result<()>;

    /// All keys under `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<CacheKey>>;
}
