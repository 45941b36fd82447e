use clap::Subcommand;
use fc_core::error::AppError;
use fc_core::models::Notification;
use fc_services::Fleet;

use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum NotificationAction {
    /// Newest first
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { id: String },
    ReadAll,
    Delete { id: String },
    /// Remove every notification
    Clear,
}

fn row(n: &Notification) -> String {
    format!(
        "{} {:<24}  {:<8}  {:<20}  {}",
        if n.read { " " } else { "*" },
        n.id,
        n.priority.as_str(),
        n.title,
        n.message,
    )
}

pub async fn run(fleet: &Fleet, out: Output, action: NotificationAction) -> anyhow::Result<()> {
    let center = fleet.notifications();
    match action {
        NotificationAction::List { unread } => {
            let mut all = center.get_notifications().await;
            if unread {
                all.retain(|n| !n.read);
            }
            out.list(&all, "no notifications", row)
        }
        NotificationAction::Read { id } => {
            if !center.mark_as_read(&id).await? {
                return Err(AppError::not_found("Notification", &id).into());
            }
            out.status(true, &format!("marked {id} as read"))
        }
        NotificationAction::ReadAll => {
            let changed = center.mark_all_as_read().await?;
            out.status(true, &format!("marked {changed} notifications as read"))
        }
        NotificationAction::Delete { id } => {
            if !center.delete_notification(&id).await? {
                return Err(AppError::not_found("Notification", &id).into());
            }
            out.status(true, &format!("deleted notification {id}"))
        }
        NotificationAction::Clear => {
            center.clear_all().await?;
            out.status(true, "notifications cleared")
        }
    }
}
