//! # Component Repository
//!
//! Components live under `components`. Every mutation is announced through
//! the [`NotificationCenter`].

use std::sync::Arc;

use chrono::Utc;
use fc_core::error::Result;
use fc_core::models::{
    generate_id, Component, NewComponent, NewNotification, NotificationPriority,
    COMPONENT_ID_PREFIX,
};
use fc_core::traits::{keys, KvStore};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::collection::Collection;
use crate::fixtures;
use crate::notifications::NotificationCenter;

pub struct ComponentRepo {
    collection: Collection<Component>,
    notifications: Arc<NotificationCenter>,
}

impl ComponentRepo {
    pub fn new(store: Arc<dyn KvStore>, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            collection: Collection::new(store, keys::COMPONENTS, fixtures::components),
            notifications,
        }
    }

    pub async fn list(&self) -> Result<Vec<Component>> {
        self.collection.load().await
    }

    pub async fn list_by_ship(&self, ship_id: &str) -> Result<Vec<Component>> {
        let mut components = self.list().await?;
        components.retain(|c| c.ship_id == ship_id);
        Ok(components)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Component>> {
        self.collection.find(id).await
    }

    /// Ship existence is not checked here; see `ShipRepo::add_component`.
    pub async fn create(&self, draft: NewComponent) -> Result<Component> {
        draft.validate()?;

        let component = draft.into_component(generate_id(COMPONENT_ID_PREFIX), Utc::now());
        let component = self.collection.insert(component).await?;
        info!(id = %component.id, ship_id = %component.ship_id, "component created");

        self.notifications
            .create_notification(NewNotification::new(
                "component_created",
                "New Component Added",
                format!("New component added: {}", component.name),
            ))
            .await?;
        Ok(component)
    }

    pub async fn update(&self, id: &str, patch: &Value) -> Result<Option<Component>> {
        let Some((_, component)) = self.collection.update(id, patch).await? else {
            return Ok(None);
        };
        info!(id = %component.id, "component updated");

        self.notifications
            .create_notification(NewNotification::new(
                "component_updated",
                "Component Updated",
                format!("Component updated: {}", component.name),
            ))
            .await?;
        Ok(Some(component))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let Some(component) = self.collection.remove(id).await? else {
            return Ok(false);
        };
        info!(id = %component.id, "component deleted");

        self.notifications
            .create_notification(
                NewNotification::new(
                    "component_deleted",
                    "Component Deleted",
                    format!("Component deleted: {}", component.name),
                )
                .with_priority(NotificationPriority::Warning),
            )
            .await?;
        Ok(true)
    }

    /// Records a service. `next_maintenance_date` is left as it was.
    pub async fn update_last_maintenance_date(
        &self,
        id: &str,
        date: &str,
    ) -> Result<Option<Component>> {
        let patch = serde_json::json!({ "lastMaintenanceDate": date });
        let Some((_, component)) = self.collection.update(id, &patch).await? else {
            return Ok(None);
        };
        info!(id = %component.id, date, "last maintenance date recorded");

        self.notifications
            .create_notification(
                NewNotification::new(
                    "success",
                    "Maintenance Updated",
                    format!("Maintenance date updated for: {}", component.name),
                )
                .with_priority(NotificationPriority::Success),
            )
            .await?;
        Ok(Some(component))
    }

    /// Removes every component of `ship_id`; used by ship deletion.
    pub(crate) async fn delete_for_ship(&self, ship_id: &str) -> Result<usize> {
        let removed = self.collection.remove_where(|c| c.ship_id == ship_id).await?;
        if removed > 0 {
            info!(ship_id, removed, "components removed with their ship");
        }
        Ok(removed)
    }

    /// Overwrites the stored components with the fixtures.
    pub async fn reset(&self) -> Result<Vec<Component>> {
        let components = self.collection.reset().await?;
        info!(count = components.len(), "components reset to fixtures");
        Ok(components)
    }
}
