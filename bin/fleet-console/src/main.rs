//! # Fleet Console Binary
//!
//! Assembles the console from configuration: picks the storage adapter,
//! builds the services and runs one command against them.

mod bootstrap;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fc_config::{AppConfig, StorageBackend, MAX_HORIZON_DAYS};
use fc_core::traits::KvStore;
use fc_services::Fleet;
use tracing::debug;

use commands::auth::AuthCommand;
use commands::components::ComponentAction;
use commands::jobs::JobAction;
use commands::notifications::NotificationAction;
use commands::ships::ShipAction;
use output::Output;

#[derive(Parser, Debug)]
#[command(
    name = "fleet-console",
    about = "Fleet maintenance console: ships, components, jobs and notifications",
    version,
    propagate_version = true
)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// TOML configuration file
    #[arg(long, global = true, env = "FLEET_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend: local, sqlite or memory
    #[arg(long, global = true)]
    backend: Option<StorageBackend>,

    /// Directory of the local JSON store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage ships
    Ships {
        #[command(subcommand)]
        action: ShipAction,
    },
    /// Manage ship components
    Components {
        #[command(subcommand)]
        action: ComponentAction,
    },
    /// Manage maintenance jobs
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },
    /// KPI dashboard summary
    Kpi {
        /// Evaluate as of this date instead of now
        #[arg(long)]
        now: Option<String>,
        /// Upcoming-maintenance window in days
        #[arg(long, value_parser = parse_horizon)]
        days: Option<u32>,
    },
    /// Components due for maintenance soon
    Upcoming {
        #[arg(long)]
        now: Option<String>,
        #[arg(long, value_parser = parse_horizon)]
        days: Option<u32>,
        /// Also publish a "Maintenance Due" notification for each
        #[arg(long)]
        notify: bool,
    },
    /// Notification center
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
    /// Sign in as one of the console users
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check whether the signed-in user may open a console route
    CanAccess { route: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 1. Configuration: defaults < file < environment < flags
    let mut config =
        AppConfig::load_with_dotenv(cli.config.as_deref()).context("loading configuration")?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    bootstrap::init_tracing(&config.log)?;
    debug!(?config, "starting");

    // 2. Storage
    let store = bootstrap::open_store(&config.storage).await?;
    let out = Output::new(cli.json);
    let horizon_days = config.dashboard.horizon_days;

    // 3. Dispatch. Session commands only need the store.
    match cli.command {
        Commands::Ships { action } => {
            commands::ships::run(&services(store, horizon_days).await?, out, action).await
        }
        Commands::Components { action } => {
            let fleet = services(store, horizon_days).await?;
            commands::components::run(&fleet, out, action).await
        }
        Commands::Jobs { action } => {
            commands::jobs::run(&services(store, horizon_days).await?, out, action).await
        }
        Commands::Kpi { now, days } => {
            let now = commands::parse_now(now.as_deref())?;
            let fleet = services(store, days.unwrap_or(horizon_days)).await?;
            commands::dashboard::kpi(&fleet, out, now).await
        }
        Commands::Upcoming { now, days, notify } => {
            let now = commands::parse_now(now.as_deref())?;
            let fleet = services(store, days.unwrap_or(horizon_days)).await?;
            commands::dashboard::upcoming(&fleet, out, now, notify).await
        }
        Commands::Notifications { action } => {
            let fleet = services(store, horizon_days).await?;
            commands::notifications::run(&fleet, out, action).await
        }
        Commands::Login { email, password } => {
            commands::auth::run(store, &config.auth, out, AuthCommand::Login { email, password })
                .await
        }
        Commands::Logout => commands::auth::run(store, &config.auth, out, AuthCommand::Logout).await,
        Commands::Whoami => commands::auth::run(store, &config.auth, out, AuthCommand::Whoami).await,
        Commands::CanAccess { route } => {
            commands::auth::run(store, &config.auth, out, AuthCommand::CanAccess { route }).await
        }
    }
}

/// Builds the services and echoes every new notification to stderr.
fn parse_horizon(raw: &str) -> Result<u32, String> {
    let days: u32 = raw.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_HORIZON_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(format!("must be between 1 and {MAX_HORIZON_DAYS}"))
    }
}

async fn services(store: Arc<dyn KvStore>, horizon_days: u32) -> anyhow::Result<Fleet> {
    let fleet = Fleet::init(store)
        .await
        .context("initialising services")?
        .with_horizon_days(horizon_days);
    fleet.notifications().subscribe(|n| {
        eprintln!("[{}] {}: {}", n.priority, n.title, n.message);
        Ok(())
    });
    Ok(fleet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fleet-console",
            "jobs",
            "list",
            "--ship",
            "s1",
            "--json",
            "--backend",
            "memory",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.backend, Some(StorageBackend::Memory));
        assert!(matches!(
            cli.command,
            Commands::Jobs {
                action: JobAction::List { ship: Some(_), .. }
            }
        ));
    }

    #[test]
    fn horizon_flag_is_bounded() {
        let parse = |days: &str| Cli::try_parse_from(["fleet-console", "upcoming", "--days", days]);
        assert!(parse("4000000000").is_err());
        assert!(parse("0").is_err());
        assert!(parse("30").is_ok());
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let result = Cli::try_parse_from([
            "fleet-console",
            "ships",
            "create",
            "--name",
            "X",
            "--status",
            "sunk",
        ]);
        assert!(result.is_err());
    }
}
