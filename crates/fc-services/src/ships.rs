//! # Ship Repository
//!
//! Ships live under `ships`. Deleting a ship also deletes its components.

use std::sync::Arc;

use chrono::Utc;
use fc_core::error::Result;
use fc_core::models::{
    generate_id, Component, NewComponent, NewNotification, NewShip, NotificationPriority, Ship,
    SHIP_ID_PREFIX,
};
use fc_core::traits::{keys, KvStore};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::collection::Collection;
use crate::components::ComponentRepo;
use crate::fixtures;
use crate::notifications::NotificationCenter;

pub struct ShipRepo {
    collection: Collection<Ship>,
    components: Arc<ComponentRepo>,
    notifications: Arc<NotificationCenter>,
}

impl ShipRepo {
    pub fn new(
        store: Arc<dyn KvStore>,
        components: Arc<ComponentRepo>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            collection: Collection::new(store, keys::SHIPS, fixtures::ships),
            components,
            notifications,
        }
    }

    pub async fn list(&self) -> Result<Vec<Ship>> {
        self.collection.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Ship>> {
        self.collection.find(id).await
    }

    pub async fn create(&self, draft: NewShip) -> Result<Ship> {
        draft.validate()?;

        let ship = draft.into_ship(generate_id(SHIP_ID_PREFIX), Utc::now());
        let ship = self.collection.insert(ship).await?;
        info!(id = %ship.id, name = %ship.name, "ship created");

        self.notifications
            .create_notification(NewNotification::new(
                "ship_created",
                "New Ship Added",
                format!("New ship added: {}", ship.name),
            ))
            .await?;
        Ok(ship)
    }

    pub async fn update(&self, id: &str, patch: &Value) -> Result<Option<Ship>> {
        let Some((_, ship)) = self.collection.update(id, patch).await? else {
            return Ok(None);
        };
        info!(id = %ship.id, "ship updated");

        self.notifications
            .create_notification(NewNotification::new(
                "ship_updated",
                "Ship Updated",
                format!("Ship updated: {}", ship.name),
            ))
            .await?;
        Ok(Some(ship))
    }

    /// Deletes the ship and every component that belongs to it. Components go
    /// first, so a failed write never leaves components pointing at a removed
    /// ship.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        let removed = self.components.delete_for_ship(id).await?;
        let Some(ship) = self.collection.remove(id).await? else {
            return Ok(false);
        };
        info!(id = %ship.id, components = removed, "ship deleted");

        self.notifications
            .create_notification(
                NewNotification::new(
                    "ship_deleted",
                    "Ship Deleted",
                    format!("Ship deleted: {} ({removed} components removed)", ship.name),
                )
                .with_priority(NotificationPriority::Warning),
            )
            .await?;
        Ok(true)
    }

    pub async fn components(&self, ship_id: &str) -> Result<Vec<Component>> {
        self.components.list_by_ship(ship_id).await
    }

    /// Adds a component to an existing ship. Returns `None` when the ship does
    /// not exist. The installation date defaults to today.
    pub async fn add_component(
        &self,
        ship_id: &str,
        mut draft: NewComponent,
    ) -> Result<Option<Component>> {
        if self.get_by_id(ship_id).await?.is_none() {
            return Ok(None);
        }

        draft.ship_id = ship_id.to_string();
        if draft.installation_date.is_none() {
            draft.installation_date = Some(Utc::now().format("%Y-%m-%d").to_string());
        }
        self.components.create(draft).await.map(Some)
    }
}
