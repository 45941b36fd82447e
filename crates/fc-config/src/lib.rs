//! # fc-config
//!
//! Layered configuration for the fleet console.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`FLEET__*`, `__` between sections), e.g.
//!    `FLEET__STORAGE__BACKEND=sqlite` -> `storage.backend`
//! 2. An optional TOML file (`--config <file>`, or `fleet-console.toml` in
//!    the working directory)
//! 3. Built-in defaults
//!
//! `.env` is read by [`AppConfig::load_with_dotenv`] before the environment
//! layer is built.

mod error;

pub use error::ConfigError;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

pub const ENV_PREFIX: &str = "FLEET";
pub const DEFAULT_CONFIG_FILE: &str = "fleet-console.toml";

/// Which `KvStore` adapter backs the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Local => "local",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                field: "storage.backend".into(),
                reason: format!("'{other}' is not one of local, sqlite, memory"),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding the JSON store file.
    pub data_dir: PathBuf,
    pub sqlite_url: String,
}

/// Widest accepted upcoming-maintenance window, about a century.
pub const MAX_HORIZON_DAYS: u32 = 36_500;

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    pub horizon_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// Replaces the admin fixture password when set.
    #[serde(default)]
    pub admin_password: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
    pub log: LogConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Defaults, then `file` (or `fleet-console.toml` if present), then the
    /// process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(file, None)
    }

    /// Same as [`AppConfig::load`] after reading `.env` into the environment.
    pub fn load_with_dotenv(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), ".env loaded");
        }
        Self::load(file)
    }

    /// Builds from an explicit variable map instead of the process
    /// environment when `env` is `Some`.
    pub fn build(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("storage.backend", "local")?
            .set_default("storage.data_dir", "./data")?
            .set_default("storage.sqlite_url", "sqlite:fleet-console.db")?
            .set_default("dashboard.horizon_days", 7)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?;

        builder = match file {
            // An explicitly named file must exist.
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder.add_source(
                File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
            ),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            backend = %config.storage.backend,
            horizon_days = config.dashboard.horizon_days,
            "configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HORIZON_DAYS).contains(&self.dashboard.horizon_days) {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.horizon_days".into(),
                reason: format!("must be between 1 and {MAX_HORIZON_DAYS}"),
            });
        }
        if self.storage.backend == StorageBackend::Sqlite && self.storage.sqlite_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.sqlite_url".into(),
                reason: "required for the sqlite backend".into(),
            });
        }
        Ok(())
    }
}
