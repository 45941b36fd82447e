//! Whole-collection persistence shared by every repository.
//!
//! A collection is one JSON array under one store key. Every read loads the
//! full array; every mutation rewrites it. That keeps the store contract
//! trivial and is only suitable for small fleets: cost grows linearly with
//! the collection on every write.

use std::sync::Arc;

use fc_core::error::{AppError, Result};
use fc_core::models::Record;
use fc_core::traits::KvStore;
use serde_json::Value;
use tracing::{debug, warn};

pub(crate) struct Collection<T> {
    store: Arc<dyn KvStore>,
    key: &'static str,
    fixtures: fn() -> Vec<T>,
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn KvStore>, key: &'static str, fixtures: fn() -> Vec<T>) -> Self {
        Self {
            store,
            key,
            fixtures,
        }
    }

    /// Loads the collection, seeding it from fixtures when the key is absent.
    /// A failing store read is treated exactly like an absent key.
    pub async fn load(&self) -> Result<Vec<T>> {
        match self.store.get(self.key).await {
            Ok(Some(value)) => serde_json::from_value(value).map_err(|e| {
                AppError::Internal(format!("stored '{}' is malformed: {e}", self.key))
            }),
            Ok(None) => Ok(self.seed().await),
            Err(e) => {
                warn!(key = self.key, error = %e, "store read failed, falling back to fixtures");
                Ok(self.seed().await)
            }
        }
    }

    /// Persists the fixtures and returns them. A failed write is logged; the
    /// fixtures are still returned so read paths keep working.
    async fn seed(&self) -> Vec<T> {
        let items = (self.fixtures)();
        match self.save(&items).await {
            Ok(()) => debug!(key = self.key, count = items.len(), "collection seeded"),
            Err(e) => warn!(key = self.key, error = %e, "could not persist fixtures"),
        }
        items
    }

    pub async fn save(&self, items: &[T]) -> Result<()> {
        let value = serde_json::to_value(items)
            .map_err(|e| AppError::Internal(format!("cannot serialize '{}': {e}", self.key)))?;
        self.store
            .set(self.key, value)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write '{}': {e:#}", self.key)))?;
        debug!(key = self.key, count = items.len(), "collection written");
        Ok(())
    }

    /// Drops whatever is stored and writes the fixtures back.
    pub async fn reset(&self) -> Result<Vec<T>> {
        self.store
            .remove(self.key)
            .await
            .map_err(|e| AppError::Internal(format!("failed to clear '{}': {e:#}", self.key)))?;
        let items = (self.fixtures)();
        self.save(&items).await?;
        Ok(items)
    }

    pub async fn find(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load().await?.into_iter().find(|item| item.id() == id))
    }

    pub async fn insert(&self, item: T) -> Result<T> {
        let mut items = self.load().await?;
        items.push(item.clone());
        self.save(&items).await?;
        Ok(item)
    }

    /// Applies `patch` to the record with `id`. Returns `(before, after)`, or
    /// `None` when no such record exists.
    pub async fn update(&self, id: &str, patch: &Value) -> Result<Option<(T, T)>> {
        let mut items = self.load().await?;
        let Some(index) = items.iter().position(|item| item.id() == id) else {
            return Ok(None);
        };

        let updated = merge_patch(&items[index], patch)?;
        let before = std::mem::replace(&mut items[index], updated.clone());
        self.save(&items).await?;
        Ok(Some((before, updated)))
    }

    /// Replaces the record with the same id as `item`.
    pub async fn replace(&self, item: T) -> Result<Option<T>> {
        let mut items = self.load().await?;
        let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) else {
            return Ok(None);
        };
        *slot = item.clone();
        self.save(&items).await?;
        Ok(Some(item))
    }

    pub async fn remove(&self, id: &str) -> Result<Option<T>> {
        let mut items = self.load().await?;
        let Some(index) = items.iter().position(|item| item.id() == id) else {
            return Ok(None);
        };
        let removed = items.remove(index);
        self.save(&items).await?;
        Ok(Some(removed))
    }

    /// Removes every record matching `predicate`; returns how many went.
    /// Nothing is written when nothing matches.
    pub async fn remove_where<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|item| !predicate(item));
        let removed = before - items.len();
        if removed > 0 {
            self.save(&items).await?;
        }
        Ok(removed)
    }
}

/// Shallow merge: each top-level key of `patch` replaces the record's field.
/// Input aliases are mapped to canonical names first and `id` is immutable.
pub(crate) fn merge_patch<T: Record>(record: &T, patch: &Value) -> Result<T> {
    let Value::Object(patch) = patch else {
        return Err(AppError::ValidationError(format!(
            "{} patch must be a JSON object",
            T::ENTITY
        )));
    };

    let mut merged = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(AppError::Internal(format!(
                "{} does not serialize to an object",
                T::ENTITY
            )))
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    for (key, value) in patch {
        let key = T::ALIASES
            .iter()
            .find(|(alias, _)| *alias == key.as_str())
            .map(|(_, canonical)| *canonical)
            .unwrap_or(key.as_str());
        if key == "id" {
            continue;
        }
        merged.insert(key.to_string(), value.clone());
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::ValidationError(format!("invalid {} patch: {e}", T::ENTITY)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use fc_core::models::{JobStatus, MaintenanceJob, Ship, ShipStatus};
    use fc_core::traits::{keys, MockKvStore};
    use fc_storage_local::MemoryStore;
    use serde_json::json;

    #[test]
    fn merge_replaces_top_level_fields_only() {
        let ship = fixtures::ships().remove(0);
        let merged = merge_patch(&ship, &json!({"status": "maintenance", "id": "hijack"})).unwrap();
        assert_eq!(merged.id, "s1");
        assert_eq!(merged.status, ShipStatus::Maintenance);
        assert_eq!(merged.name, "Ever Given");
    }

    #[test]
    fn merge_maps_aliases_to_canonical_fields() {
        let job = fixtures::jobs().remove(0);
        let merged: MaintenanceJob =
            merge_patch(&job, &json!({"jobType": "Engine overhaul", "dueDate": "2024-06-01"}))
                .unwrap();
        assert_eq!(merged.title, "Engine overhaul");
        assert_eq!(merged.scheduled_date.as_deref(), Some("2024-06-01"));
        assert_eq!(merged.status, JobStatus::Scheduled);
    }

    #[test]
    fn merge_rejects_non_objects_and_bad_values() {
        let ship = fixtures::ships().remove(0);
        assert!(matches!(
            merge_patch(&ship, &json!(["status"])),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            merge_patch(&ship, &json!({"status": "sunk"})),
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn first_load_seeds_and_persists_fixtures() {
        let store = Arc::new(MemoryStore::new());
        let ships: Collection<Ship> = Collection::new(store.clone(), keys::SHIPS, fixtures::ships);

        let loaded = ships.load().await.unwrap();
        assert_eq!(loaded, fixtures::ships());
        assert!(store.get(keys::SHIPS).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failing_read_falls_back_to_fixtures() {
        let mut store = MockKvStore::new();
        store
            .expect_get()
            .withf(|key| key == keys::SHIPS)
            .returning(|_| Err(anyhow::anyhow!("storage unavailable")));
        store
            .expect_set()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));

        let ships: Collection<Ship> = Collection::new(Arc::new(store), keys::SHIPS, fixtures::ships);
        assert_eq!(ships.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_collection_is_an_internal_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SHIPS, json!({"not": "an array"})).await.unwrap();
        let ships: Collection<Ship> = Collection::new(store, keys::SHIPS, fixtures::ships);
        assert!(matches!(ships.load().await, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn failed_write_is_propagated_on_mutation() {
        let mut store = MockKvStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(json!([]))));
        store
            .expect_set()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));

        let ships: Collection<Ship> = Collection::new(Arc::new(store), keys::SHIPS, fixtures::ships);
        let ship = fixtures::ships().remove(0);
        assert!(matches!(ships.insert(ship).await, Err(AppError::Internal(_))));
    }
}
