//! File persistence for the simulated backends.
//!
//! The durable store and cookie jar are loaded from JSON files into the
//! in-memory backends, used for one command, then written back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use local_cache::{CacheItem, MemoryCookieJar, MemoryStore, StoredCookie};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::CliConfig;

/// Cache over file-persisted backends.
pub type FileCache = CacheItem<MemoryStore, MemoryCookieJar>;

const DURABLE_FILE: &str = "durable.json";
const COOKIES_FILE: &str = "cookies.json";

/// Backends persisted under a data directory.
pub struct FileBackends {
    dir: PathBuf,
}

impl FileBackends {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the backends and build a cache over them.
    pub fn open(&self, config: &CliConfig) -> Result<FileCache> {
        let durable = if config.store.durable {
            let entries = read_json(&self.dir.join(DURABLE_FILE))?.unwrap_or_default();
            Some(MemoryStore::from_entries(entries))
        } else {
            None
        };

        let cookies: Vec<StoredCookie> =
            read_json(&self.dir.join(COOKIES_FILE))?.unwrap_or_default();
        let jar = MemoryCookieJar::from_cookies(cookies, local_cache::SystemClock);

        CacheItem::new(durable, jar, config.cache.clone()).context("Failed to open cache")
    }

    /// Persist the backends of `cache`.
    pub fn save(&self, cache: &FileCache) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;

        if let Ok(durable) = cache.durable() {
            write_json(&self.dir.join(DURABLE_FILE), &durable.store().entries())?;
        }
        write_json(
            &self.dir.join(COOKIES_FILE),
            &cache.cookies().jar().live_cookies(),
        )
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
