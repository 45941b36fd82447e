//! # Notification Center
//!
//! An in-process log of notifications, persisted under `notifications`, with
//! synchronous fan-out to subscribers. Subscribers run in registration order;
//! a subscriber that fails or panics is logged and skipped.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use fc_core::error::Result;
use fc_core::models::{
    generate_id, Component, MaintenanceJob, NewNotification, Notification, NotificationPriority,
    NOTIFICATION_ID_PREFIX,
};
use fc_core::traits::{keys, KvStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::fixtures;

/// Callback invoked with every newly created notification.
pub type Subscriber = Arc<dyn Fn(&Notification) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`NotificationCenter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct NotificationCenter {
    collection: Collection<Notification>,
    log: Mutex<Vec<Notification>>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

impl NotificationCenter {
    /// Loads the persisted log (seeding it on first use).
    pub async fn init(store: Arc<dyn KvStore>) -> Result<Self> {
        let collection = Collection::new(store, keys::NOTIFICATIONS, fixtures::notifications);
        let mut log = collection.load().await?;
        newest_first(&mut log);
        debug!(count = log.len(), "notification log loaded");

        Ok(Self {
            collection,
            log: Mutex::new(log),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Returns `true` if the handle was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Newest first by `created_at`. Entries with the same timestamp keep
    /// their log order.
    pub async fn get_notifications(&self) -> Vec<Notification> {
        let mut all = self.log.lock().await.clone();
        newest_first(&mut all);
        all
    }

    pub async fn unread_count(&self) -> usize {
        fc_core::stats::unread_count(&self.log.lock().await)
    }

    /// Prepends a new notification, persists the log and notifies every
    /// subscriber with the stored record.
    pub async fn create_notification(&self, draft: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: generate_id(NOTIFICATION_ID_PREFIX),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            priority: draft.priority,
            created_at: Utc::now(),
            read: false,
        };

        {
            let mut log = self.log.lock().await;
            let mut next = Vec::with_capacity(log.len() + 1);
            next.push(notification.clone());
            next.extend(log.iter().cloned());
            self.commit(&mut log, next).await?;
        }

        info!(id = %notification.id, kind = %notification.kind, "notification created");
        self.broadcast(&notification);
        Ok(notification)
    }

    fn broadcast(&self, notification: &Notification) {
        // Cloned so a callback may subscribe or unsubscribe without deadlocking.
        let subscribers: Vec<(SubscriptionId, Subscriber)> = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for (id, callback) in subscribers {
            match catch_unwind(AssertUnwindSafe(|| callback(notification))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(subscriber = id.0, error = %e, "notification subscriber failed"),
                Err(_) => warn!(subscriber = id.0, "notification subscriber panicked"),
            }
        }
    }

    /// Persists `next` and only then makes it the in-memory log, so a failed
    /// write leaves both unchanged.
    async fn commit(&self, log: &mut Vec<Notification>, next: Vec<Notification>) -> Result<()> {
        self.collection.save(&next).await?;
        *log = next;
        Ok(())
    }

    /// Returns `false` when no notification has this id.
    pub async fn mark_as_read(&self, id: &str) -> Result<bool> {
        let mut log = self.log.lock().await;
        let Some(index) = log.iter().position(|n| n.id == id) else {
            return Ok(false);
        };
        if !log[index].read {
            let mut next = log.clone();
            next[index].read = true;
            self.commit(&mut log, next).await?;
        }
        Ok(true)
    }

    /// Returns how many notifications changed state.
    pub async fn mark_all_as_read(&self) -> Result<usize> {
        let mut log = self.log.lock().await;
        let changed = log.iter().filter(|n| !n.read).count();
        if changed > 0 {
            let mut next = log.clone();
            next.iter_mut().for_each(|n| n.read = true);
            self.commit(&mut log, next).await?;
        }
        Ok(changed)
    }

    pub async fn delete_notification(&self, id: &str) -> Result<bool> {
        let mut log = self.log.lock().await;
        let Some(index) = log.iter().position(|n| n.id == id) else {
            return Ok(false);
        };
        let mut next = log.clone();
        next.remove(index);
        self.commit(&mut log, next).await?;
        Ok(true)
    }

    /// Empties the log. Subscribers are not notified.
    pub async fn clear_all(&self) -> Result<()> {
        let mut log = self.log.lock().await;
        self.commit(&mut log, Vec::new()).await?;
        info!("notification log cleared");
        Ok(())
    }

    // ── Domain helpers ─────────────────────────────────────────────────────

    pub async fn notify_job_created(&self, job: &MaintenanceJob) -> Result<Notification> {
        self.create_notification(NewNotification::new(
            "job_created",
            "New Maintenance Job",
            format!("Job \"{}\" has been created", job.title),
        ))
        .await
    }

    pub async fn notify_job_updated(&self, job: &MaintenanceJob) -> Result<Notification> {
        self.create_notification(NewNotification::new(
            "job_updated",
            "Job Updated",
            format!("Job \"{}\" has been updated", job.title),
        ))
        .await
    }

    pub async fn notify_job_completed(&self, job: &MaintenanceJob) -> Result<Notification> {
        self.create_notification(
            NewNotification::new(
                "job_completed",
                "Job Completed",
                format!("Job \"{}\" has been completed", job.title),
            )
            .with_priority(NotificationPriority::Success),
        )
        .await
    }

    pub async fn notify_maintenance_due(
        &self,
        component: &Component,
        ship_name: &str,
    ) -> Result<Notification> {
        let due = component
            .next_maintenance_date
            .as_deref()
            .map(|d| format!("on {d}"))
            .unwrap_or_else(|| "soon".to_string());
        self.create_notification(
            NewNotification::new(
                "maintenance_due",
                "Maintenance Due",
                format!("Maintenance for \"{}\" on {ship_name} is due {due}", component.name),
            )
            .with_priority(NotificationPriority::Warning),
        )
        .await
    }
}

fn newest_first(log: &mut [Notification]) {
    log.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
