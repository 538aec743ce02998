//! Region tree walker.
//!
//! Fetches one root region listing and the precinct document of each of its
//! direct children. The useful output is the populated cache; the extractor
//! reads it back independently.

use tracing::info;

use crate::api::endpoints::{precinct_path, region_path};
use crate::cache::JsonCache;
use crate::fetcher::CachedFetcher;
use crate::models::{decode, RegionListing};
use crate::utils::cache_label;

/// Pasig City, the default root.
pub const DEFAULT_ROOT_CODE: &str = "7403000";

/// What a walk visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub root_code: String,
    pub children: usize,
}

pub struct RegionWalker<'a, C: JsonCache> {
    fetcher: &'a CachedFetcher<C>,
}

impl<'a, C: JsonCache> RegionWalker<'a, C> {
    pub fn new(fetcher: &'a CachedFetcher<C>) -> Self {
        Self { fetcher }
    }

    /// Cache the precinct document of every direct child of `root_code`, in
    /// listing order. Does not descend further.
    pub async fn walk(&self, root_code: &str) -> crate::Result<WalkReport> {
        let path = region_path(root_code);
        let url = self.fetcher.api().url_for(&path);
        let root = self.fetcher.fetch_path(&path, Some(root_code)).await?;
        let listing: RegionListing = decode(&url, root)?;

        info!(root = root_code, children = listing.regions.len(), "Walking child regions");

        for region in &listing.regions {
            let label = cache_label(&region.name, &region.code);
            self.fetcher
                .fetch_path(&precinct_path(&region.code), Some(&label))
                .await?;
        }

        Ok(WalkReport {
            root_code: root_code.to_string(),
            children: listing.regions.len(),
        })
    }
}
