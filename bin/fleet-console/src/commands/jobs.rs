use clap::Subcommand;
use fc_core::error::AppError;
use fc_core::filter::JobFilter;
use fc_core::models::{JobPriority, MaintenanceJob, NewJob};
use fc_services::Fleet;

use super::{parse_date_arg, PatchArgs};
use crate::output::{opt, Output};

#[derive(Subcommand, Debug)]
pub enum JobAction {
    /// List jobs; filters combine, omitted filters match everything
    List {
        #[arg(long)]
        ship: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    Show { id: String },
    /// Schedule a job against a component of a ship
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        ship: String,
        #[arg(long)]
        component: String,
        #[arg(long, default_value = "medium")]
        priority: JobPriority,
        /// Engineer user id
        #[arg(long)]
        assigned_to: Option<String>,
        /// Scheduled date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
    },
    Delete { id: String },
    /// Jobs scheduled on exactly this date
    Calendar { date: String },
    /// Jobs scheduled between two dates, inclusive
    Range { start: String, end: String },
}

fn row(job: &MaintenanceJob) -> String {
    format!(
        "{:<36}  {:<10}  {:<12}  {:<6}  {:<6}  {:<6}  {}",
        job.id,
        opt(job.scheduled_date.as_deref()),
        job.status.as_str(),
        job.priority.as_str(),
        job.ship_id,
        opt(job.component_id.as_deref()),
        job.title,
    )
}

pub async fn run(fleet: &Fleet, out: Output, action: JobAction) -> anyhow::Result<()> {
    let jobs = fleet.jobs();
    match action {
        JobAction::List {
            ship,
            status,
            priority,
        } => {
            let filter = JobFilter {
                ship_id: ship.unwrap_or_default(),
                status: status.unwrap_or_default(),
                priority: priority.unwrap_or_default(),
            };
            out.list(&fleet.maintenance_list(&filter).await?, "no jobs", row)
        }
        JobAction::Show { id } => {
            let job = jobs
                .get_by_id(&id)
                .await?
                .ok_or_else(|| AppError::not_found("MaintenanceJob", &id))?;
            out.show(&job, |j| {
                vec![
                    row(j),
                    format!("assigned to: {}", opt(j.assigned_to.as_deref())),
                    format!("window: {} .. {}", opt(j.start_date.as_deref()), opt(j.end_date.as_deref())),
                    format!("notes: {}", opt(j.notes.as_deref())),
                ]
            })
        }
        JobAction::Create {
            title,
            ship,
            component,
            priority,
            assigned_to,
            date,
            description,
            notes,
        } => {
            let job = fleet
                .schedule_job(NewJob {
                    title,
                    description,
                    ship_id: ship,
                    component_id: Some(component),
                    priority,
                    assigned_to,
                    start_date: date.clone(),
                    scheduled_date: date,
                    end_date: None,
                    notes,
                })
                .await?;
            out.show(&job, |j| vec![format!("scheduled job {}", j.id)])
        }
        JobAction::Update { id, patch } => {
            let job = jobs
                .update(&id, &patch.into_value()?)
                .await?
                .ok_or_else(|| AppError::not_found("MaintenanceJob", &id))?;
            out.show(&job, |j| vec![row(j)])
        }
        JobAction::Delete { id } => {
            if !jobs.delete(&id).await? {
                return Err(AppError::not_found("MaintenanceJob", &id).into());
            }
            out.status(true, &format!("deleted job {id}"))
        }
        JobAction::Calendar { date } => {
            let day = fleet.calendar_day(&date).await?;
            out.list(&day, &format!("nothing scheduled on {date}"), row)
        }
        JobAction::Range { start, end } => {
            let found = fleet
                .jobs_in_range(parse_date_arg(&start)?, parse_date_arg(&end)?)
                .await?;
            out.list(&found, "no jobs in range", row)
        }
    }
}
