//! # Filtering
//!
//! Sparse equality filters shared by the maintenance list and the calendar.
//! A constraint with an empty expected value places no restriction, so a
//! filter built from an untouched form matches everything.

use chrono::{DateTime, Utc};

use crate::models::{Component, MaintenanceJob, Ship};
use crate::stats::parse_date;

/// Records that expose named string fields to a [`Filter`].
pub trait Filterable {
    /// The field's current value, or `None` when the record has no value for
    /// it (or no such field).
    fn field(&self, name: &str) -> Option<&str>;
}

/// Conjunction of exact string-equality constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    constraints: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field == expected`. An empty `expected` is kept but ignored.
    pub fn with(mut self, field: impl Into<String>, expected: impl Into<String>) -> Self {
        self.constraints.push((field.into(), expected.into()));
        self
    }

    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.constraints.iter().all(|(_, expected)| expected.is_empty())
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.constraints
            .iter()
            .filter(|(_, expected)| !expected.is_empty())
            .all(|(field, expected)| record.field(field) == Some(expected.as_str()))
    }

    /// Keeps matching records in their original order.
    pub fn apply<T: Filterable + Clone>(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|r| self.matches(*r))
            .cloned()
            .collect()
    }
}

/// The maintenance list's filter bar. Empty strings mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub ship_id: String,
    pub status: String,
    pub priority: String,
}

impl From<&JobFilter> for Filter {
    fn from(f: &JobFilter) -> Self {
        Filter::new()
            .with("shipId", f.ship_id.clone())
            .with("status", f.status.clone())
            .with("priority", f.priority.clone())
    }
}

pub fn filter_jobs(jobs: &[MaintenanceJob], filter: &JobFilter) -> Vec<MaintenanceJob> {
    Filter::from(filter).apply(jobs)
}

/// Calendar bucket: jobs whose `scheduledDate` string equals `date` exactly.
pub fn jobs_on_date(jobs: &[MaintenanceJob], date: &str) -> Vec<MaintenanceJob> {
    Filter::new().with("scheduledDate", date).apply(jobs)
}

/// Jobs scheduled within `[start, end]` inclusive. Jobs without a parseable
/// `scheduledDate` are excluded.
pub fn jobs_in_range(
    jobs: &[MaintenanceJob],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<MaintenanceJob> {
    jobs.iter()
        .filter(|job| {
            job.scheduled_date
                .as_deref()
                .and_then(parse_date)
                .is_some_and(|d| d >= start && d <= end)
        })
        .cloned()
        .collect()
}

impl Filterable for MaintenanceJob {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            "title" => Some(self.title.as_str()),
            "shipId" => Some(self.ship_id.as_str()),
            "componentId" => self.component_id.as_deref(),
            "status" => Some(self.status.as_str()),
            "priority" => Some(self.priority.as_str()),
            "assignedTo" => self.assigned_to.as_deref(),
            "scheduledDate" => self.scheduled_date.as_deref(),
            "startDate" => self.start_date.as_deref(),
            "endDate" => self.end_date.as_deref(),
            _ => None,
        }
    }
}

impl Filterable for Component {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            "shipId" => Some(self.ship_id.as_str()),
            "name" => Some(self.name.as_str()),
            "type" => Some(self.component_type.as_str()),
            "status" => Some(self.status.as_str()),
            "serialNumber" => self.serial_number.as_deref(),
            "nextMaintenanceDate" => self.next_maintenance_date.as_deref(),
            "lastMaintenanceDate" => self.last_maintenance_date.as_deref(),
            _ => None,
        }
    }
}

impl Filterable for Ship {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            "name" => Some(self.name.as_str()),
            "type" => Some(self.ship_type.as_str()),
            "buildYear" => Some(self.build_year.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobPriority, JobStatus};

    fn job(id: &str, ship: &str, status: JobStatus, priority: JobPriority, date: Option<&str>) -> MaintenanceJob {
        MaintenanceJob {
            id: id.into(),
            title: format!("job {id}"),
            description: None,
            ship_id: ship.into(),
            component_id: None,
            priority,
            status,
            assigned_to: Some("3".into()),
            scheduled_date: date.map(String::from),
            start_date: None,
            end_date: None,
            completed_on_time: false,
            notes: None,
            created_at: None,
        }
    }

    fn sample() -> Vec<MaintenanceJob> {
        vec![
            job("j1", "s1", JobStatus::Scheduled, JobPriority::High, Some("2024-05-05")),
            job("j2", "s2", JobStatus::InProgress, JobPriority::Medium, Some("2024-03-15")),
            job("j3", "s1", JobStatus::Completed, JobPriority::Low, Some("2024-02-01")),
            job("j4", "s1", JobStatus::Scheduled, JobPriority::High, None),
        ]
    }

    #[test]
    fn empty_filter_is_identity() {
        let jobs = sample();
        assert_eq!(filter_jobs(&jobs, &JobFilter::default()), jobs);
        assert!(Filter::from(&JobFilter::default()).is_empty());
    }

    #[test]
    fn constraints_are_conjunctive() {
        let jobs = sample();
        let filter = JobFilter {
            ship_id: "s1".into(),
            priority: "high".into(),
            ..Default::default()
        };
        let ids: Vec<String> = filter_jobs(&jobs, &filter).into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["j1", "j4"]);

        let filter = JobFilter {
            status: "in_progress".into(),
            ..Default::default()
        };
        assert_eq!(filter_jobs(&jobs, &filter).len(), 1);
    }

    #[test]
    fn missing_field_never_matches_a_constraint() {
        let jobs = sample();
        let filter = Filter::new().with("componentId", "c1");
        assert!(filter.apply(&jobs).is_empty());
        let filter = Filter::new().with("noSuchField", "x");
        assert!(filter.apply(&jobs).is_empty());
    }

    #[test]
    fn calendar_bucket_uses_exact_string_equality() {
        let jobs = sample();
        assert_eq!(jobs_on_date(&jobs, "2024-05-05").len(), 1);
        assert!(jobs_on_date(&jobs, "2024-5-5").is_empty());
    }

    #[test]
    fn date_range_is_inclusive() {
        let jobs = sample();
        let start = parse_date("2024-02-01").unwrap();
        let end = parse_date("2024-03-15").unwrap();
        let ids: Vec<String> = jobs_in_range(&jobs, start, end).into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["j2", "j3"]);
    }
}
