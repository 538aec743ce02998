//! Application configuration management.
//!
//! Configuration is read from `~/.config/ercache/config.json` (or an explicit
//! path). Every field has a default, so a missing file is not an error.
//! `ERCACHE_*` environment variables override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::DEFAULT_BASE_URL;
use crate::api::RetryPolicy;
use crate::crawl::DEFAULT_ROOT_CODE;
use crate::fetcher::{CacheValidity, DEFAULT_FETCH_DELAY_MS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "ercache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Used when the platform has no cache directory
const FALLBACK_CACHE_DIR: &str = "cache";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub root_code: String,
    /// `None` means the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    pub output: PathBuf,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub fetch_delay_ms: u64,
    pub revalidate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root_code: DEFAULT_ROOT_CODE.to_string(),
            cache_dir: None,
            output: PathBuf::from("results.csv"),
            request_timeout_secs: 10,
            max_attempts: 5,
            backoff_base_ms: 1000,
            fetch_delay_ms: DEFAULT_FETCH_DELAY_MS,
            revalidate: false,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Overlay `ERCACHE_*` variables looked up through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("ERCACHE_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("ERCACHE_ROOT_CODE") {
            self.root_code = v;
        }
        if let Some(v) = lookup("ERCACHE_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("ERCACHE_FETCH_DELAY_MS") {
            self.fetch_delay_ms = v
                .parse()
                .with_context(|| format!("ERCACHE_FETCH_DELAY_MS is not a number: {}", v))?;
        }
        if let Some(v) = lookup("ERCACHE_REVALIDATE") {
            self.revalidate = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Configured directory, else the platform cache directory, else `./cache`.
    pub fn cache_dir(&self) -> PathBuf {
        self.resolve_cache_dir(dirs::cache_dir())
    }

    fn resolve_cache_dir(&self, platform: Option<PathBuf>) -> PathBuf {
        if let Some(ref dir) = self.cache_dir {
            return dir.clone();
        }
        match platform {
            Some(dir) => dir.join(APP_NAME),
            None => PathBuf::from(FALLBACK_CACHE_DIR),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(self.max_attempts)
            .with_backoff_base(Duration::from_millis(self.backoff_base_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn validity(&self) -> CacheValidity {
        if self.revalidate {
            CacheValidity::Revalidate
        } else {
            CacheValidity::Trusted
        }
    }
}
