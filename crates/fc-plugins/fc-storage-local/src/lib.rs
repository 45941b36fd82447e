//! # fc-storage-local
//! fleet-console/crates/fc-plugins/fc-storage-local/src/lib.rs
//! Local implementations of `KvStore`, the stand-ins for browser local storage.
//!
//! - [`LocalJsonStore`]: every key lives in one JSON object file, rewritten
//!   wholesale on each mutation.
//! - [`MemoryStore`]: a concurrent map that never touches disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use dashmap::DashMap;
use fc_core::traits::KvStore;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Default file name inside the configured data directory.
pub const STORE_FILE_NAME: &str = "fleet-console.json";

pub struct LocalJsonStore {
    /// Path of the backing file (e.g., "./data/fleet-console.json")
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl LocalJsonStore {
    /// Opens the store file, treating a missing file as an empty store.
    /// A file that is not a JSON object is logged and ignored; the next write
    /// replaces it.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file is not a JSON object, starting empty");
                    Map::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "local store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Opens `<dir>/fleet-console.json`.
    pub async fn open_in_dir(dir: &Path) -> anyhow::Result<Self> {
        Self::open(dir.join(STORE_FILE_NAME)).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file through a temp file + rename so a crash never
    /// leaves a half-written store behind.
    async fn flush(&self, entries: &Map<String, Value>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "local store flushed");
        Ok(())
    }
}

#[async_trait]
impl KvStore for LocalJsonStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        // The write guard is held across the flush so writers are serialized.
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }
}

/// Ephemeral store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert!(store.get("ships").await.unwrap().is_none());

        store.set("ships", json!([{"id": "s1"}])).await.unwrap();
        assert_eq!(store.get("ships").await.unwrap(), Some(json!([{"id": "s1"}])));

        store.set("ships", json!([])).await.unwrap();
        assert_eq!(store.get("ships").await.unwrap(), Some(json!([])));

        store.remove("ships").await.unwrap();
        store.remove("ships").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn local_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalJsonStore::open_in_dir(dir.path()).await.unwrap();
            store.set("auth_token", json!("abc")).await.unwrap();
            store.set("ships", json!([{"id": "s1", "name": "Ever Given"}])).await.unwrap();
            store.remove("auth_token").await.unwrap();
        }

        let reopened = LocalJsonStore::open_in_dir(dir.path()).await.unwrap();
        assert!(reopened.get("auth_token").await.unwrap().is_none());
        assert_eq!(
            reopened.get("ships").await.unwrap(),
            Some(json!([{"id": "s1", "name": "Ever Given"}]))
        );
        assert!(!reopened.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn local_store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/store.json");
        let store = LocalJsonStore::open(&nested).await.unwrap();
        store.set("k", json!(1)).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, b"[1, 2, 3").unwrap();

        let store = LocalJsonStore::open(&path).await.unwrap();
        assert!(store.get("ships").await.unwrap().is_none());

        store.set("ships", json!([])).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"ships\""));
    }
}
