use clap::Subcommand;
use fc_core::error::AppError;
use fc_core::models::{NewShip, Ship, ShipStatus};
use fc_services::Fleet;

use super::PatchArgs;
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum ShipAction {
    /// List every ship
    List,
    /// Show one ship with its components
    Show { id: String },
    /// Register a ship
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "")]
        ship_type: String,
        #[arg(long, default_value = "")]
        build_year: String,
        #[arg(long, default_value = "active")]
        status: ShipStatus,
    },
    /// Change fields of a ship
    Update {
        id: String,
        #[command(flatten)]
        patch: PatchArgs,
    },
    /// Delete a ship and all of its components
    Delete { id: String },
}

fn row(ship: &Ship) -> String {
    format!(
        "{:<36}  {:<20}  {:<16}  {:<6}  {}",
        ship.id, ship.name, ship.ship_type, ship.build_year, ship.status
    )
}

pub async fn run(fleet: &Fleet, out: Output, action: ShipAction) -> anyhow::Result<()> {
    let ships = fleet.ships();
    match action {
        ShipAction::List => out.list(&ships.list().await?, "no ships", row),
        ShipAction::Show { id } => {
            let ship = ships
                .get_by_id(&id)
                .await?
                .ok_or_else(|| AppError::not_found("Ship", &id))?;
            let components = ships.components(&id).await?;
            let detail = serde_json::json!({ "ship": ship, "components": components });
            out.show(&detail, |_| {
                let mut lines = vec![row(&ship), format!("components: {}", components.len())];
                lines.extend(
                    components
                        .iter()
                        .map(|c| format!("  {:<36}  {:<20}  {}", c.id, c.name, c.status)),
                );
                lines
            })
        }
        ShipAction::Create {
            name,
            ship_type,
            build_year,
            status,
        } => {
            let ship = ships
                .create(NewShip {
                    name,
                    ship_type,
                    build_year,
                    status,
                })
                .await?;
            out.show(&ship, |s| vec![format!("created ship {}", s.id)])
        }
        ShipAction::Update { id, patch } => {
            let ship = ships
                .update(&id, &patch.into_value()?)
                .await?
                .ok_or_else(|| AppError::not_found("Ship", &id))?;
            out.show(&ship, |s| vec![row(s)])
        }
        ShipAction::Delete { id } => {
            if !ships.delete(&id).await? {
                return Err(AppError::not_found("Ship", &id).into());
            }
            out.status(true, &format!("deleted ship {id}"))
        }
    }
}
