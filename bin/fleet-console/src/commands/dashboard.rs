use chrono::{DateTime, Utc};
use fc_core::stats::{HistogramBucket, UpcomingMaintenance};
use fc_services::Fleet;

use crate::output::{opt, Output};

fn upcoming_row(u: &UpcomingMaintenance) -> String {
    format!(
        "{:<10}  {:<20}  {:<20}  {}",
        opt(u.component.next_maintenance_date.as_deref()),
        u.ship_name,
        u.component.name,
        u.component.status,
    )
}

fn histogram_lines(title: &str, buckets: &[HistogramBucket]) -> Vec<String> {
    let mut lines = vec![format!("{title}:")];
    lines.extend(buckets.iter().map(|b| format!("  {:<22} {}", b.name, b.value)));
    lines
}

pub async fn kpi(fleet: &Fleet, out: Output, now: DateTime<Utc>) -> anyhow::Result<()> {
    let summary = fleet.kpi_summary(now).await?;
    out.show(&summary, |s| {
        let mut lines = vec![
            format!("total ships:          {}", s.total_ships),
            format!("overdue components:   {}", s.overdue_components),
            format!("active jobs:          {}", s.active_jobs),
            format!("completed jobs:       {}", s.completed_jobs),
        ];
        lines.extend(histogram_lines("jobs by status", &s.job_status));
        lines.extend(histogram_lines("components by status", &s.component_status));
        lines.push(format!("due within {} days:", fleet.horizon_days()));
        if s.upcoming.is_empty() {
            lines.push("  nothing due".into());
        }
        lines.extend(s.upcoming.iter().map(|u| format!("  {}", upcoming_row(u))));
        lines
    })
}

/// Lists components due soon; with `notify`, also publishes a notice for each.
pub async fn upcoming(
    fleet: &Fleet,
    out: Output,
    now: DateTime<Utc>,
    notify: bool,
) -> anyhow::Result<()> {
    let due = fleet.upcoming_maintenance(now).await?;
    if notify {
        fleet.announce_upcoming(now).await?;
    }
    let empty = format!("nothing due within {} days", fleet.horizon_days());
    out.list(&due, &empty, upcoming_row)
}
