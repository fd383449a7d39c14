//! Local cache store: the browser-localStorage role, as an injected capability
//!
//! The cache is a disposable mirror of the last reconciled snapshot. It
//! never holds data the remote does not also hold (outside a partition),
//! so every write here is best-effort: failures are logged and swallowed.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Cache key for the serialized settings snapshot
pub const SETTINGS_KEY: &str = "site_settings";
/// Cache key for the serialized posts snapshot
pub const POSTS_KEY: &str = "blog_posts";

/// Key-value persistence contract for snapshot caching.
///
/// Implementations are pass-through stores with no merge logic of their
/// own; precedence rules live in the sync engine.
pub trait CacheStore: Send + Sync {
    /// Read the raw value for a logical key, if present
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value under a logical key, best-effort
    fn set(&self, key: &str, value: &str);

    /// Drop a logical key, best-effort
    fn remove(&self, key: &str);
}

/// In-memory store, for tests and short-lived embeddings
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
    }
}

/// File-backed store: one file per logical key inside a directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(key, error = %e, "cache directory unavailable, skipping write");
            return;
        }
        if let Err(e) = fs::write(self.path(key), value) {
            warn!(key, error = %e, "cache write failed");
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }
}

/// Read and deserialize a cached snapshot; a corrupt entry reads as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable cache entry");
            None
        }
    }
}

/// Serialize and persist a snapshot (write-through after reconciliation).
pub fn write_json<T: Serialize>(store: &dyn CacheStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => {
            debug!(key, bytes = raw.len(), "cache write-through");
            store.set(key, &raw);
        }
        Err(e) => warn!(key, error = %e, "cache serialization failed"),
    }
}
