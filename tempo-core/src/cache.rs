//! Time-expiring response cache persisted as a JSON file.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WeatherError;

pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    body: Value,
}

/// Decoded response bodies keyed by request URL (without the API key).
///
/// With no backing path the cache lives only in memory.
#[derive(Debug)]
pub struct ResponseCache {
    path: Option<PathBuf>,
    expire_after: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn in_memory(expire_after: Duration) -> Self {
        Self {
            path: None,
            expire_after,
            entries: HashMap::new(),
        }
    }

    /// Open the cache file at `path`. A missing file starts an empty cache;
    /// an unreadable or corrupt one is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>, expire_after: Duration) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), "discarding response cache: {err}");
                HashMap::new()
            }
        };

        Self {
            path: Some(path),
            expire_after,
            entries,
        }
    }

    /// Fresh body for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<&Value> {
        let entry = self.entries.get(key)?;
        let age = now.signed_duration_since(entry.stored_at).to_std().ok()?;
        if age < self.expire_after {
            debug!(?age, "cache hit");
            Some(&entry.body)
        } else {
            debug!(?age, "cache entry expired");
            None
        }
    }

    /// Store `body` under `key` and persist the cache.
    ///
    /// The in-memory entry is kept even if writing the file fails.
    pub fn insert(&mut self, key: impl Into<String>, body: Value) -> Result<(), WeatherError> {
        self.insert_at(key.into(), body, Utc::now())
    }

    fn insert_at(
        &mut self,
        key: String,
        body: Value,
        now: DateTime<Utc>,
    ) -> Result<(), WeatherError> {
        let expire_after = self.expire_after;
        self.entries.retain(|_, e| {
            now.signed_duration_since(e.stored_at)
                .to_std()
                .map(|age| age < expire_after)
                .unwrap_or(true)
        });
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                body,
            },
        );
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), WeatherError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Cache(format!(
                    "failed to create cache directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string(&self.entries)
            .map_err(|e| WeatherError::Cache(format!("failed to serialize cache: {e}")))?;

        fs::write(path, json).map_err(|e| {
            WeatherError::Cache(format!("failed to write {}: {e}", path.display()))
        })
    }

    fn read_entries(path: &Path) -> Result<HashMap<String, CacheEntry>, WeatherError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| WeatherError::Cache(format!("failed to read {}: {e}", path.display())))?;

        serde_json::from_str(&contents)
            .map_err(|e| WeatherError::Cache(format!("failed to parse {}: {e}", path.display())))
    }
}
