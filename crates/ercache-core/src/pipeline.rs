//! End-to-end wiring: config → fetcher, and walk → extract.

use anyhow::Context;
use tracing::info;

use crate::api::ApiClient;
use crate::cache::{CacheManager, JsonCache};
use crate::config::Config;
use crate::crawl::RegionWalker;
use crate::extract::ResultExtractor;
use crate::fetcher::CachedFetcher;
use crate::models::FlatRecord;

/// Build the production fetcher described by `config`.
pub fn build_fetcher(config: &Config) -> anyhow::Result<CachedFetcher<CacheManager>> {
    let api = ApiClient::new(&config.base_url, config.request_timeout(), config.retry_policy())
        .context("Failed to build HTTP client")?;
    let cache_dir = config.cache_dir();
    let cache = CacheManager::new(cache_dir.clone())
        .with_context(|| format!("Failed to open cache at {}", cache_dir.display()))?;
    Ok(CachedFetcher::new(api, cache)
        .with_validity(config.validity())
        .with_fetch_delay(config.fetch_delay()))
}

/// Walk `root_code`, then extract from whatever the cache now holds.
pub async fn run<C: JsonCache>(
    fetcher: &CachedFetcher<C>,
    root_code: &str,
) -> crate::Result<Vec<FlatRecord>> {
    let report = RegionWalker::new(fetcher).walk(root_code).await?;
    info!(root = %report.root_code, children = report.children, "Walk complete");
    ResultExtractor::new(fetcher).extract().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::api::{HttpResponse, RetryPolicy};
    use crate::error::PipelineError;
    use crate::export::{read_csv_file, write_csv_file};
    use crate::testing::ScriptedTransport;

    const BASE: &str = "https://results.test";

    fn fetcher(transport: &Arc<ScriptedTransport>, dir: &TempDir) -> CachedFetcher<CacheManager> {
        let api = ApiClient::with_transport(
            transport.clone(),
            BASE,
            RetryPolicy::new().with_backoff_base(Duration::ZERO),
        );
        CachedFetcher::new(api, CacheManager::new(dir.path().to_path_buf()).unwrap())
            .with_fetch_delay(Duration::ZERO)
    }

    /// Bagong Ilog under Pasig, one precinct, one national contest.
    fn seed_pasig(transport: &ScriptedTransport) {
        transport.respond_json(
            &format!("{BASE}/data/regions/local/7403000.json"),
            json!({"regions": [{"code": "740300100", "name": "Bagong Ilog"}]}),
        );
        transport.respond_json(
            &format!("{BASE}/data/regions/precinct/74/740300100.json"),
            json!({"regions": [{"code": format!("740{}", "300100001")}]}),
        );
        transport.respond_json(
            &format!("{BASE}/data/er/740/740300100001.json"),
            json!({
                "national": [{
                    "contestName": "SENATOR",
                    "candidates": {"candidates": [
                        {"name": "A", "votes": 100, "percentage": 50.0},
                        {"name": "B", "votes": 100, "percentage": 50.0}
                    ]}
                }],
                "local": []
            }),
        );
    }

    #[tokio::test]
    async fn test_pasig_scenario() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        seed_pasig(&transport);
        let fetcher = fetcher(&transport, &dir);

        let records = run(&fetcher, "7403000").await.unwrap();

        assert_eq!(
            records,
            vec![
                FlatRecord {
                    precinct: "740300100001".to_string(),
                    contest: "SENATOR".to_string(),
                    candidate: "A".to_string(),
                    votes: 100,
                    percentage: 50.0,
                },
                FlatRecord {
                    precinct: "740300100001".to_string(),
                    contest: "SENATOR".to_string(),
                    candidate: "B".to_string(),
                    votes: 100,
                    percentage: 50.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_second_run_is_offline_and_identical() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        seed_pasig(&transport);
        let fetcher = fetcher(&transport, &dir);

        let first = run(&fetcher, "7403000").await.unwrap();
        let requests_after_first = transport.total_requests();
        assert_eq!(requests_after_first, 3);

        let second = run(&fetcher, "7403000").await.unwrap();
        assert_eq!(transport.total_requests(), requests_after_first);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fresh_process_reuses_cache_directory() {
        let dir = TempDir::new().unwrap();
        let online = Arc::new(ScriptedTransport::new());
        seed_pasig(&online);
        let first = run(&fetcher(&online, &dir), "7403000").await.unwrap();

        // New transport with no routes: any request would 404
        let offline = Arc::new(ScriptedTransport::new());
        let second = run(&fetcher(&offline, &dir), "7403000").await.unwrap();

        assert_eq!(offline.total_requests(), 0);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_cache_entries() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        seed_pasig(&transport);
        transport.script(
            &format!("{BASE}/data/er/740/740300100001.json"),
            vec![HttpResponse::new(StatusCode::BAD_GATEWAY, ""); 5],
        );
        let fetcher = fetcher(&transport, &dir);

        let err = run(&fetcher, "7403000").await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(err, PipelineError::TransientFetch { attempts: 5, .. }));
        // The precinct document fetched before the failure is still cached
        assert_eq!(fetcher.cache().list("data/regions/precinct").unwrap().len(), 1);
        assert!(fetcher.cache().list("data/er").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_round_trip_of_run_output() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        seed_pasig(&transport);
        let records = run(&fetcher(&transport, &dir), "7403000").await.unwrap();

        let csv = dir.path().join("results.csv");
        write_csv_file(&csv, &records).unwrap();
        assert_eq!(read_csv_file(&csv).unwrap(), records);
    }

    #[test]
    fn test_build_fetcher_creates_cache_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            cache_dir: Some(dir.path().join("nested").join("cache")),
            ..Default::default()
        };
        let fetcher = build_fetcher(&config).unwrap();
        assert!(fetcher.cache().cache_dir().is_dir());
        assert_eq!(fetcher.api().base_url(), "https://2025electionresults.comelec.gov.ph");
    }
}
