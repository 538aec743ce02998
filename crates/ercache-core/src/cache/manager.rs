use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CacheKey, JsonCache};
use crate::api::Validators;
use crate::error::{PipelineError, Result};

/// Where a cached document came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub url: String,
    /// Human-readable name for the entry, e.g. `Bagong Ilog_740300100`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub validators: Validators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
    #[serde(default)]
    pub source: SourceInfo,
}

impl<T> CachedData<T> {
    pub fn new(data: T, source: SourceInfo) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
            source,
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// Parse an HTTP-date (`Tue, 13 May 2025 08:00:00 GMT`).
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .map_err(|e| PipelineError::filesystem(&cache_dir, e))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cache_path(&self, key: &CacheKey) -> PathBuf {
        key.as_str()
            .split('/')
            .fold(self.cache_dir.clone(), |path, seg| path.join(seg))
    }

    /// Stamp the file with the upstream modification time so its age on disk
    /// reflects source freshness rather than fetch time.
    fn apply_last_modified(path: &Path, last_modified: &str) -> Result<()> {
        let Some(modified) = parse_http_date(last_modified) else {
            warn!(path = %path.display(), value = last_modified, "Unparsable Last-Modified header");
            return Ok(());
        };
        let file = fs::File::options()
            .write(true)
            .open(path)
            .map_err(|e| PipelineError::filesystem(path, e))?;
        file.set_modified(SystemTime::from(modified))
            .map_err(|e| PipelineError::filesystem(path, e))?;
        Ok(())
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<CacheKey>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| PipelineError::filesystem(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| PipelineError::filesystem(dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                if let Ok(relative) = path.strip_prefix(&self.cache_dir) {
                    let segments: Vec<String> = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    keys.push(CacheKey::from_remote_path(&segments.join("/")));
                }
            }
        }
        Ok(())
    }
}

impl JsonCache for CacheManager {
    fn exists(&self, key: &CacheKey) -> bool {
        self.cache_path(key).is_file()
    }

    fn get(&self, key: &CacheKey) -> Result<Option<CachedData<Value>>> {
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| PipelineError::filesystem(&path, e))?;
        let cached: CachedData<Value> = serde_json::from_str(&contents)
            .map_err(|e| PipelineError::filesystem(&path, e.into()))?;

        Ok(Some(cached))
    }

    fn put(&self, key: &CacheKey, entry: &CachedData<Value>) -> Result<()> {
        let path = self.cache_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::filesystem(parent, e))?;
        }

        let contents =
            serde_json::to_string(entry).map_err(|e| PipelineError::filesystem(&path, e.into()))?;
        fs::write(&path, contents).map_err(|e| PipelineError::filesystem(&path, e))?;
        debug!(key = %key, "Cached");

        if let Some(ref last_modified) = entry.source.validators.last_modified {
            Self::apply_last_modified(&path, last_modified)?;
        }
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<CacheKey>> {
        let root = self.cache_path(&CacheKey::from_remote_path(prefix));
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        self.collect_keys(&root, &mut keys)?;
        keys.sort();
        Ok(keys)
    }
}

// ============================================================================
// Tests
// ============================================================================
