//! Process setup: logging and the storage adapter chosen by configuration.

use std::sync::Arc;

use anyhow::Context;
use fc_config::{LogConfig, StorageBackend, StorageConfig};
use fc_core::traits::KvStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Feature-gated adapters: only what was compiled in can be selected.
#[cfg(feature = "storage-local")]
use fc_storage_local::{LocalJsonStore, MemoryStore};

#[cfg(feature = "storage-sqlite")]
use fc_storage_sqlite::SqliteKvStore;

/// Installs the global subscriber. `RUST_LOG` wins over `log.level`. Logs go
/// to stderr so stdout stays clean for command output.
pub fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log.level '{}'", log.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

pub async fn open_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    match storage.backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let store = LocalJsonStore::open_in_dir(&storage.data_dir)
                .await
                .with_context(|| format!("opening store in {}", storage.data_dir.display()))?;
            info!(path = %store.path().display(), "using local JSON store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "storage-local")]
        StorageBackend::Memory => {
            info!("using in-memory store; nothing will be persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "storage-sqlite")]
        StorageBackend::Sqlite => {
            let store = SqliteKvStore::new(&storage.sqlite_url)
                .await
                .with_context(|| format!("opening sqlite store {}", storage.sqlite_url))?;
            info!(url = %storage.sqlite_url, "using sqlite store");
            Ok(Arc::new(store))
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("storage backend '{other}' is not compiled into this binary"),
    }
}
