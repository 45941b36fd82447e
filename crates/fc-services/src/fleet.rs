//! # Fleet
//!
//! Wires the repositories and the notification center over one store and
//! exposes the dashboard, maintenance list and calendar queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fc_core::error::{AppError, Result};
use fc_core::filter::{filter_jobs, jobs_in_range, jobs_on_date, JobFilter};
use fc_core::models::{MaintenanceJob, NewJob, Notification};
use fc_core::stats::{self, KpiSummary, UpcomingMaintenance, DEFAULT_HORIZON_DAYS};
use fc_core::traits::KvStore;
use tracing::{debug, info};

use crate::components::ComponentRepo;
use crate::jobs::JobRepo;
use crate::notifications::NotificationCenter;
use crate::ships::ShipRepo;

pub struct Fleet {
    ships: ShipRepo,
    components: Arc<ComponentRepo>,
    jobs: JobRepo,
    notifications: Arc<NotificationCenter>,
    horizon_days: u32,
}

impl Fleet {
    /// Builds every service over `store`. The notification log is loaded (and
    /// seeded if needed) here; entity collections are seeded on first access.
    pub async fn init(store: Arc<dyn KvStore>) -> Result<Self> {
        let notifications = Arc::new(NotificationCenter::init(store.clone()).await?);
        let components = Arc::new(ComponentRepo::new(store.clone(), notifications.clone()));
        let ships = ShipRepo::new(store.clone(), components.clone(), notifications.clone());
        let jobs = JobRepo::new(store, notifications.clone());
        debug!("fleet services initialised");

        Ok(Self {
            ships,
            components,
            jobs,
            notifications,
            horizon_days: DEFAULT_HORIZON_DAYS,
        })
    }

    /// Width of the upcoming-maintenance window.
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn ships(&self) -> &ShipRepo {
        &self.ships
    }

    pub fn components(&self) -> &ComponentRepo {
        &self.components
    }

    pub fn jobs(&self) -> &JobRepo {
        &self.jobs
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    // ── Dashboard ──────────────────────────────────────────────────────────

    pub async fn kpi_summary(&self, now: DateTime<Utc>) -> Result<KpiSummary> {
        let ships = self.ships.list().await?;
        let components = self.components.list().await?;
        let jobs = self.jobs.list().await?;
        Ok(stats::kpi_summary(
            &ships,
            &components,
            &jobs,
            now,
            self.horizon_days,
        ))
    }

    pub async fn upcoming_maintenance(&self, now: DateTime<Utc>) -> Result<Vec<UpcomingMaintenance>> {
        let ships = self.ships.list().await?;
        let components = self.components.list().await?;
        Ok(stats::upcoming(&components, &ships, now, self.horizon_days))
    }

    /// Publishes a "Maintenance Due" notice for every component in the
    /// upcoming window.
    pub async fn announce_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Notification>> {
        let mut sent = Vec::new();
        for entry in self.upcoming_maintenance(now).await? {
            sent.push(
                self.notifications
                    .notify_maintenance_due(&entry.component, &entry.ship_name)
                    .await?,
            );
        }
        info!(count = sent.len(), "maintenance due notices published");
        Ok(sent)
    }

    // ── Maintenance list & calendar ────────────────────────────────────────

    pub async fn maintenance_list(&self, filter: &JobFilter) -> Result<Vec<MaintenanceJob>> {
        Ok(filter_jobs(&self.jobs.list().await?, filter))
    }

    pub async fn calendar_day(&self, date: &str) -> Result<Vec<MaintenanceJob>> {
        Ok(jobs_on_date(&self.jobs.list().await?, date))
    }

    pub async fn jobs_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceJob>> {
        Ok(jobs_in_range(&self.jobs.list().await?, start, end))
    }

    /// Creates a job after checking that its ship exists and that the
    /// referenced component belongs to that ship.
    pub async fn schedule_job(&self, draft: NewJob) -> Result<MaintenanceJob> {
        if self.ships.get_by_id(&draft.ship_id).await?.is_none() {
            return Err(AppError::not_found("Ship", &draft.ship_id));
        }

        if let Some(component_id) = draft.component_id.as_deref() {
            let component = self
                .components
                .get_by_id(component_id)
                .await?
                .ok_or_else(|| AppError::not_found("Component", component_id))?;
            if component.ship_id != draft.ship_id {
                return Err(AppError::Conflict(format!(
                    "component {component_id} belongs to ship {}, not {}",
                    component.ship_id, draft.ship_id
                )));
            }
        }

        self.jobs.create(draft).await
    }
}
