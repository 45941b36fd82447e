//! # Derived Statistics
//!
//! Pure functions behind the KPI dashboard. Nothing here performs I/O: callers
//! load the collections first and pass them in together with `now`.
//!
//! Dates are parsed leniently (`YYYY-MM-DD` as midnight UTC, or RFC 3339).
//! A date that does not parse never matches, so a malformed record drops out
//! of the overdue and upcoming sets instead of failing the whole dashboard.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Component, JobStatus, MaintenanceJob, Notification, Ship};

/// Placeholder ship name for components whose ship no longer exists.
pub const UNKNOWN_SHIP: &str = "Unknown Ship";

/// Default width of the upcoming-maintenance window, in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn due_date(component: &Component) -> Option<DateTime<Utc>> {
    component.next_maintenance_date.as_deref().and_then(parse_date)
}

pub fn count_by_status(jobs: &[MaintenanceJob], status: JobStatus) -> usize {
    jobs.iter().filter(|job| job.status == status).count()
}

/// Components whose next maintenance date has passed and that are not in the
/// resolved state.
pub fn count_overdue_components(components: &[Component], now: DateTime<Utc>) -> usize {
    components
        .iter()
        .filter(|c| !c.status.is_resolved())
        .filter(|c| due_date(c).is_some_and(|due| due < now))
        .count()
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// A chart slice: display label and number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub name: String,
    pub value: usize,
}

/// `in_progress` -> `In progress`.
pub fn display_label(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Counts each distinct value of `field`, keeping the order in which values
/// are first seen.
pub fn histogram<'a, T, I, F>(items: I, field: F) -> Vec<HistogramBucket>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut order: Vec<(&'a str, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for item in items {
        let value = field(item);
        match index.get(value) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(value, order.len());
                order.push((value, 1));
            }
        }
    }

    order
        .into_iter()
        .map(|(value, count)| HistogramBucket {
            name: display_label(value),
            value: count,
        })
        .collect()
}

/// A component due within the upcoming window, annotated with its ship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenance {
    #[serde(flatten)]
    pub component: Component,
    pub ship_name: String,
    #[serde(skip)]
    pub due: DateTime<Utc>,
}

/// Components due in `[now, now + horizon_days]`, soonest first. Equal due
/// dates keep their input order.
pub fn upcoming(
    components: &[Component],
    ships: &[Ship],
    now: DateTime<Utc>,
    horizon_days: u32,
) -> Vec<UpcomingMaintenance> {
    let end = now
        .checked_add_signed(Duration::days(i64::from(horizon_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let ship_names: HashMap<&str, &str> = ships
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();

    let mut due_soon: Vec<UpcomingMaintenance> = components
        .iter()
        .filter_map(|c| {
            let due = due_date(c)?;
            (due >= now && due <= end).then(|| UpcomingMaintenance {
                component: c.clone(),
                ship_name: ship_names
                    .get(c.ship_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| UNKNOWN_SHIP.to_string()),
                due,
            })
        })
        .collect();

    // `sort_by_key` is stable.
    due_soon.sort_by_key(|u| u.due);
    due_soon
}

/// Everything the KPI dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_ships: usize,
    pub overdue_components: usize,
    pub active_jobs: usize,
    pub completed_jobs: usize,
    pub job_status: Vec<HistogramBucket>,
    pub component_status: Vec<HistogramBucket>,
    pub upcoming: Vec<UpcomingMaintenance>,
}

pub fn kpi_summary(
    ships: &[Ship],
    components: &[Component],
    jobs: &[MaintenanceJob],
    now: DateTime<Utc>,
    horizon_days: u32,
) -> KpiSummary {
    KpiSummary {
        total_ships: ships.len(),
        overdue_components: count_overdue_components(components, now),
        active_jobs: count_by_status(jobs, JobStatus::InProgress),
        completed_jobs: count_by_status(jobs, JobStatus::Completed),
        job_status: histogram(jobs, |j: &MaintenanceJob| j.status.as_str()),
        component_status: histogram(components, |c: &Component| c.status.as_str()),
        upcoming: upcoming(components, ships, now, horizon_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentStatus, JobPriority, ShipStatus};

    fn at(raw: &str) -> DateTime<Utc> {
        parse_date(raw).expect("test date")
    }

    fn ship(id: &str, name: &str) -> Ship {
        Ship {
            id: id.into(),
            name: name.into(),
            ship_type: "Container Ship".into(),
            build_year: "2018".into(),
            status: ShipStatus::Active,
            created_at: None,
        }
    }

    fn component(id: &str, ship_id: &str, next: &str, status: ComponentStatus) -> Component {
        Component {
            id: id.into(),
            ship_id: ship_id.into(),
            name: format!("component {id}"),
            component_type: "Engine".into(),
            serial_number: None,
            status,
            installation_date: None,
            last_maintenance_date: None,
            next_maintenance_date: Some(next.into()),
            maintenance_interval: Some(6),
            maintenance_history: Vec::new(),
            created_at: None,
        }
    }

    fn job(id: &str, status: JobStatus) -> MaintenanceJob {
        MaintenanceJob {
            id: id.into(),
            title: format!("job {id}"),
            description: None,
            ship_id: "s1".into(),
            component_id: Some("c1".into()),
            priority: JobPriority::High,
            status,
            assigned_to: None,
            scheduled_date: Some("2024-05-05".into()),
            start_date: None,
            end_date: None,
            completed_on_time: false,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn parses_plain_dates_and_rfc3339() {
        assert_eq!(at("2024-09-12"), at("2024-09-12T00:00:00Z"));
        assert!(parse_date("12/09/2024").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn overdue_skips_resolved_future_and_unparseable() {
        let now = at("2024-09-10");
        let components = vec![
            component("c1", "s1", "2024-06-01", ComponentStatus::MaintenanceRequired),
            component("c2", "s1", "2024-06-01", ComponentStatus::Maintained),
            component("c3", "s1", "2024-12-01", ComponentStatus::Operational),
            component("c4", "s1", "not a date", ComponentStatus::Operational),
            component("c5", "s1", "2024-09-09", ComponentStatus::Operational),
        ];
        assert_eq!(count_overdue_components(&components, now), 2);
    }

    #[test]
    fn job_histogram_sums_to_len_and_labels_are_readable() {
        let jobs = vec![
            job("j1", JobStatus::Scheduled),
            job("j2", JobStatus::InProgress),
            job("j3", JobStatus::Completed),
            job("j4", JobStatus::InProgress),
        ];
        let buckets = histogram(&jobs, |j: &MaintenanceJob| j.status.as_str());

        assert_eq!(buckets.iter().map(|b| b.value).sum::<usize>(), jobs.len());
        assert_eq!(
            buckets,
            vec![
                HistogramBucket { name: "Scheduled".into(), value: 1 },
                HistogramBucket { name: "In progress".into(), value: 2 },
                HistogramBucket { name: "Completed".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn labels_replace_every_underscore() {
        assert_eq!(display_label("maintenance_required"), "Maintenance required");
        assert_eq!(display_label("a_b_c"), "A b c");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn upcoming_window_is_inclusive_and_sorted() {
        let now = at("2024-09-10");
        let ships = vec![ship("s1", "Ever Given")];
        let components = vec![
            component("late", "s1", "2024-09-18", ComponentStatus::Operational),
            component("edge", "s1", "2024-09-17", ComponentStatus::Operational),
            component("past", "s1", "2024-09-09", ComponentStatus::Operational),
            component("today", "s1", "2024-09-10", ComponentStatus::Operational),
            component("orphan", "gone", "2024-09-12", ComponentStatus::Operational),
            component("broken", "s1", "soon", ComponentStatus::Operational),
        ];

        let result = upcoming(&components, &ships, now, 7);
        let ids: Vec<&str> = result.iter().map(|u| u.component.id.as_str()).collect();
        assert_eq!(ids, vec!["today", "orphan", "edge"]);
        assert_eq!(result[1].ship_name, UNKNOWN_SHIP);
        assert!(result
            .iter()
            .all(|u| u.due >= now && u.due <= now + Duration::days(7)));
    }

    #[test]
    fn huge_horizon_saturates_instead_of_overflowing() {
        let now = at("2024-09-10");
        let components = vec![
            component("far", "s1", "9999-12-31", ComponentStatus::Operational),
            component("past", "s1", "2024-09-09", ComponentStatus::Operational),
        ];
        let ids: Vec<String> = upcoming(&components, &[], now, u32::MAX)
            .into_iter()
            .map(|u| u.component.id)
            .collect();
        assert_eq!(ids, vec!["far"]);
    }

    #[test]
    fn upcoming_ties_keep_input_order() {
        let now = at("2024-09-10");
        let components = vec![
            component("b", "s1", "2024-09-12", ComponentStatus::Operational),
            component("a", "s1", "2024-09-12", ComponentStatus::Operational),
            component("c", "s1", "2024-09-11", ComponentStatus::Operational),
        ];
        let ids: Vec<String> = upcoming(&components, &[], now, 7)
            .into_iter()
            .map(|u| u.component.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn kpi_summary_counts() {
        let now = at("2024-09-10");
        let ships = vec![ship("s1", "Ever Given"), ship("s2", "Maersk Alabama")];
        let components = vec![
            component("c1", "s1", "2024-09-12", ComponentStatus::Operational),
            component("c2", "s2", "2024-06-01", ComponentStatus::MaintenanceRequired),
        ];
        let jobs = vec![
            job("j1", JobStatus::Scheduled),
            job("j2", JobStatus::InProgress),
            job("j3", JobStatus::Completed),
        ];

        let summary = kpi_summary(&ships, &components, &jobs, now, DEFAULT_HORIZON_DAYS);
        assert_eq!(summary.total_ships, 2);
        assert_eq!(summary.overdue_components, 1);
        assert_eq!(summary.active_jobs, 1);
        assert_eq!(summary.completed_jobs, 1);
        assert_eq!(summary.upcoming.len(), 1);
        assert_eq!(summary.upcoming[0].ship_name, "Ever Given");
        assert_eq!(summary.component_status.len(), 2);
    }
}
