//! Shared helpers for the cross-crate scenarios under `tests/`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fc_core::stats::parse_date;
use fc_core::traits::KvStore;
use fc_services::Fleet;
use fc_storage_local::MemoryStore;

/// A fresh in-memory store, typed as the port.
pub fn memory_store() -> Arc<dyn KvStore> {
    Arc::new(MemoryStore::new())
}

/// Services over a fresh in-memory store, seeded with fixtures on first use.
pub async fn memory_fleet() -> Fleet {
    Fleet::init(memory_store())
        .await
        .unwrap_or_else(|e| panic!("fleet init failed: {e}"))
}

/// `YYYY-MM-DD` or RFC 3339, panicking on malformed test input.
pub fn date(raw: &str) -> DateTime<Utc> {
    parse_date(raw).unwrap_or_else(|| panic!("bad test date {raw}"))
}
