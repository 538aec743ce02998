//! ercache core library.
//!
//! Crawls the published election-results mirror one region deep, keeps every
//! fetched document in a local JSON cache, and flattens election returns
//! into per-candidate records for CSV export.

pub mod api;
pub mod cache;
pub mod config;
pub mod crawl;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, RetryPolicy};
pub use cache::{CacheKey, CacheManager, JsonCache};
pub use config::Config;
pub use crawl::{RegionWalker, WalkReport};
pub use error::{PipelineError, Result};
pub use extract::ResultExtractor;
pub use fetcher::{CacheValidity, CachedFetcher};
pub use models::FlatRecord;
