//! Result extraction.
//!
//! Reads whatever precinct documents are currently cached (not the walker's
//! in-memory state), fetches or loads every election return they list, and
//! flattens each return's contests into [`FlatRecord`]s.

use tracing::{debug, info};

use crate::api::endpoints::{return_path, PRECINCT_PREFIX};
use crate::cache::JsonCache;
use crate::error::PipelineError;
use crate::fetcher::CachedFetcher;
use crate::models::{decode, ElectionReturn, FlatRecord, PrecinctDocument};

/// One record per candidate per contest, national contests first.
pub fn flatten_return(precinct: &str, er: &ElectionReturn) -> Vec<FlatRecord> {
    er.contests()
        .flat_map(|contest| {
            contest.candidates.candidates.iter().map(move |cand| FlatRecord {
                precinct: precinct.to_string(),
                contest: contest.contest_name.clone(),
                candidate: cand.name.clone(),
                votes: cand.votes,
                percentage: cand.percentage,
            })
        })
        .collect()
}

pub struct ResultExtractor<'a, C: JsonCache> {
    fetcher: &'a CachedFetcher<C>,
}

impl<'a, C: JsonCache> ResultExtractor<'a, C> {
    pub fn new(fetcher: &'a CachedFetcher<C>) -> Self {
        Self { fetcher }
    }

    /// Flatten every election return reachable from the cached precinct
    /// documents. Precinct documents are visited in key order, returns in
    /// document order. The first malformed document aborts the pass.
    pub async fn extract(&self) -> crate::Result<Vec<FlatRecord>> {
        let cache = self.fetcher.cache();
        let precinct_keys = cache.list(PRECINCT_PREFIX)?;
        info!(precincts = precinct_keys.len(), "Extracting election returns");

        let mut records = Vec::new();
        for key in &precinct_keys {
            let entry = cache.get(key)?.ok_or_else(|| {
                PipelineError::filesystem(
                    key.as_str(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "cache entry vanished"),
                )
            })?;
            let document: PrecinctDocument = decode(&entry.source.url, entry.data)?;

            for descriptor in &document.regions {
                let path = return_path(&descriptor.code);
                let url = self.fetcher.api().url_for(&path);
                let value = self.fetcher.fetch_path(&path, None).await?;
                let er: ElectionReturn = decode(&url, value)?;

                let flat = flatten_return(&descriptor.code, &er);
                debug!(er = %descriptor.code, records = flat.len(), "Processed election return");
                records.extend(flat);
            }
        }

        info!(records = records.len(), "Extraction complete");
        Ok(records)
    }
}
