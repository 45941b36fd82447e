use clap::Subcommand;
use fc_core::error::AppError;
use fc_core::models::{Component, ComponentStatus, NewComponent};
use fc_services::Fleet;

use super::{today, PatchArgs};
use crate::output::{opt, Output};

#[derive(Subcommand, Debug)]
pub enum ComponentAction {
    /// List components, optionally for one ship
    List {
        #[arg(long)]
        ship: Option<String>,
    },
    Show { id: String },
    /// Add a component to an existing ship
    Create {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "")]
        component_type: String,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long, default_value = "operational")]
        status: ComponentStatus,
        /// Installation date (defaults to today)
        #[arg(long)]
        installed: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        next: Option<String>,
        /// Months between services
        #[arg(long)]
        interval: Option<u32>,
    },
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
    },
    Delete { id: String },
    /// Record that a component was serviced
    Serviced {
        id: String,
        /// Service date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace all components with the built-in fixtures
    Reset,
}

fn row(c: &Component) -> String {
    format!(
        "{:<36}  {:<6}  {:<20}  {:<22}  last {:<10}  next {}",
        c.id,
        c.ship_id,
        c.name,
        c.status.as_str(),
        opt(c.last_maintenance_date.as_deref()),
        opt(c.next_maintenance_date.as_deref()),
    )
}

pub async fn run(fleet: &Fleet, out: Output, action: ComponentAction) -> anyhow::Result<()> {
    let components = fleet.components();
    match action {
        ComponentAction::List { ship } => {
            let list = match ship {
                Some(ship_id) => components.list_by_ship(&ship_id).await?,
                None => components.list().await?,
            };
            out.list(&list, "no components", row)
        }
        ComponentAction::Show { id } => {
            let component = components
                .get_by_id(&id)
                .await?
                .ok_or_else(|| AppError::not_found("Component", &id))?;
            out.show(&component, |c| {
                let mut lines = vec![row(c)];
                lines.extend(
                    c.maintenance_history
                        .iter()
                        .map(|m| format!("  {}  {}", m.date, m.description)),
                );
                lines
            })
        }
        ComponentAction::Create {
            ship,
            name,
            component_type,
            serial,
            status,
            installed,
            last,
            next,
            interval,
        } => {
            let draft = NewComponent {
                ship_id: ship.clone(),
                name,
                component_type,
                serial_number: serial,
                status,
                installation_date: installed,
                last_maintenance_date: last,
                next_maintenance_date: next,
                maintenance_interval: interval,
            };
            let component = fleet
                .ships()
                .add_component(&ship, draft)
                .await?
                .ok_or_else(|| AppError::not_found("Ship", &ship))?;
            out.show(&component, |c| vec![format!("created component {}", c.id)])
        }
        ComponentAction::Update { id, patch } => {
            let component = components
                .update(&id, &patch.into_value()?)
                .await?
                .ok_or_else(|| AppError::not_found("Component", &id))?;
            out.show(&component, |c| vec![row(c)])
        }
        ComponentAction::Delete { id } => {
            if !components.delete(&id).await? {
                return Err(AppError::not_found("Component", &id).into());
            }
            out.status(true, &format!("deleted component {id}"))
        }
        ComponentAction::Serviced { id, date } => {
            let date = date.unwrap_or_else(today);
            let component = components
                .update_last_maintenance_date(&id, &date)
                .await?
                .ok_or_else(|| AppError::not_found("Component", &id))?;
            out.show(&component, |c| vec![row(c)])
        }
        ComponentAction::Reset => {
            let restored = components.reset().await?;
            out.list(&restored, "no components", row)
        }
    }
}
