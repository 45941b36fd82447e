//! # Maintenance Job Repository
//!
//! Jobs live under `maintenance_jobs`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fc_core::error::Result;
use fc_core::filter::jobs_in_range;
use fc_core::models::{
    generate_id, JobPriority, JobStatus, MaintenanceJob, NewJob, NewNotification,
    NotificationPriority, JOB_ID_PREFIX,
};
use fc_core::traits::{keys, KvStore};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::collection::Collection;
use crate::fixtures;
use crate::notifications::NotificationCenter;

pub struct JobRepo {
    collection: Collection<MaintenanceJob>,
    notifications: Arc<NotificationCenter>,
}

impl JobRepo {
    pub fn new(store: Arc<dyn KvStore>, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            collection: Collection::new(store, keys::MAINTENANCE_JOBS, fixtures::jobs),
            notifications,
        }
    }

    pub async fn list(&self) -> Result<Vec<MaintenanceJob>> {
        self.collection.load().await
    }

    async fn list_where<P>(&self, predicate: P) -> Result<Vec<MaintenanceJob>>
    where
        P: Fn(&MaintenanceJob) -> bool,
    {
        let mut jobs = self.list().await?;
        jobs.retain(|job| predicate(job));
        Ok(jobs)
    }

    pub async fn list_by_ship(&self, ship_id: &str) -> Result<Vec<MaintenanceJob>> {
        self.list_where(|job| job.ship_id == ship_id).await
    }

    pub async fn list_by_component(&self, component_id: &str) -> Result<Vec<MaintenanceJob>> {
        self.list_where(|job| job.component_id.as_deref() == Some(component_id))
            .await
    }

    pub async fn list_by_status(&self, status: JobStatus) -> Result<Vec<MaintenanceJob>> {
        self.list_where(|job| job.status == status).await
    }

    pub async fn list_by_priority(&self, priority: JobPriority) -> Result<Vec<MaintenanceJob>> {
        self.list_where(|job| job.priority == priority).await
    }

    pub async fn list_by_engineer(&self, engineer_id: &str) -> Result<Vec<MaintenanceJob>> {
        self.list_where(|job| job.assigned_to.as_deref() == Some(engineer_id))
            .await
    }

    /// Jobs whose `scheduledDate` falls within `[start, end]`.
    pub async fn list_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceJob>> {
        Ok(jobs_in_range(&self.list().await?, start, end))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<MaintenanceJob>> {
        self.collection.find(id).await
    }

    /// New jobs are always `scheduled` and not completed on time.
    pub async fn create(&self, draft: NewJob) -> Result<MaintenanceJob> {
        draft.validate()?;

        let job = draft.into_job(generate_id(JOB_ID_PREFIX), Utc::now());
        let job = self.collection.insert(job).await?;
        info!(id = %job.id, ship_id = %job.ship_id, "job created");

        self.notifications.notify_job_created(&job).await?;
        Ok(job)
    }

    /// A transition into `completed` emits a completion notice as well.
    pub async fn update(&self, id: &str, patch: &Value) -> Result<Option<MaintenanceJob>> {
        let Some((before, job)) = self.collection.update(id, patch).await? else {
            return Ok(None);
        };
        info!(id = %job.id, status = %job.status, "job updated");

        self.notifications.notify_job_updated(&job).await?;
        if job.status == JobStatus::Completed && before.status != JobStatus::Completed {
            self.notifications.notify_job_completed(&job).await?;
        }
        Ok(Some(job))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let Some(job) = self.collection.remove(id).await? else {
            return Ok(false);
        };
        info!(id = %job.id, "job deleted");

        self.notifications
            .create_notification(
                NewNotification::new(
                    "job_deleted",
                    "Job Deleted",
                    format!("Job \"{}\" has been deleted", job.title),
                )
                .with_priority(NotificationPriority::Warning),
            )
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::error::AppError;
    use fc_core::stats::parse_date;
    use fc_storage_local::MemoryStore;
    use serde_json::json;

    async fn repo() -> (Arc<NotificationCenter>, JobRepo) {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let notifications = Arc::new(NotificationCenter::init(store.clone()).await.unwrap());
        (notifications.clone(), JobRepo::new(store, notifications))
    }

    fn draft() -> NewJob {
        NewJob {
            title: "Hull inspection".into(),
            ship_id: "s1".into(),
            component_id: Some("c1".into()),
            priority: JobPriority::Low,
            scheduled_date: Some("2024-07-01".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_delete_twice() {
        let (_, repo) = repo().await;
        let job = repo.create(draft()).await.unwrap();
        assert_eq!(job.status, JobStatus::Scheduled);
        assert!(!job.completed_on_time);

        assert!(repo.delete(&job.id).await.unwrap());
        assert!(!repo.delete(&job.id).await.unwrap());
    }

    #[tokio::test]
    async fn create_requires_component() {
        let (_, repo) = repo().await;
        let result = repo
            .create(NewJob {
                component_id: None,
                ..draft()
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn completion_emits_two_notifications_once() {
        let (notifications, repo) = repo().await;
        let before = notifications.get_notifications().await.len();

        repo.update("j1", &json!({"status": "completed"})).await.unwrap().unwrap();
        let log = notifications.get_notifications().await;
        assert_eq!(log.len(), before + 2);
        assert_eq!(log[0].title, "Job Completed");
        assert_eq!(log[1].title, "Job Updated");

        repo.update("j1", &json!({"notes": "signed off"})).await.unwrap().unwrap();
        assert_eq!(notifications.get_notifications().await.len(), before + 3);
    }

    #[tokio::test]
    async fn update_accepts_aliases() {
        let (_, repo) = repo().await;
        let job = repo
            .update("j2", &json!({"assignedEngineer": "3", "dueDate": "2024-06-30"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.assigned_to.as_deref(), Some("3"));
        assert_eq!(job.scheduled_date.as_deref(), Some("2024-06-30"));
        assert!(repo.update("missing", &json!({})).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_helpers_filter_by_field() {
        let (_, repo) = repo().await;
        let all = repo.list().await.unwrap();

        let by_ship = repo.list_by_ship("s1").await.unwrap();
        assert!(by_ship.iter().all(|j| j.ship_id == "s1"));

        let by_component = repo.list_by_component("c1").await.unwrap();
        assert!(by_component.iter().all(|j| j.component_id.as_deref() == Some("c1")));

        let scheduled = repo.list_by_status(JobStatus::Scheduled).await.unwrap();
        let others = all.iter().filter(|j| j.status != JobStatus::Scheduled).count();
        assert_eq!(scheduled.len() + others, all.len());

        let high = repo.list_by_priority(JobPriority::High).await.unwrap();
        assert!(high.iter().all(|j| j.priority == JobPriority::High));

        assert!(repo.list_by_engineer("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_range_includes_both_ends() {
        let (_, repo) = repo().await;
        let job = repo.create(draft()).await.unwrap();
        let day = parse_date("2024-07-01").unwrap();

        let found = repo.list_in_date_range(day, day).await.unwrap();
        assert!(found.iter().any(|j| j.id == job.id));
    }
}
