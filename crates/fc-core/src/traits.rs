//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::SessionUser;

/// Fixed keys under which the console persists its state.
pub mod keys {
    pub const SHIPS: &str = "ships";
    pub const COMPONENTS: &str = "components";
    pub const MAINTENANCE_JOBS: &str = "maintenance_jobs";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_DATA: &str = "user_data";
}

/// Key-value persistence contract, the analogue of browser local storage.
///
/// No transactional guarantees: concurrent read-modify-write cycles race and
/// the last write wins.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the JSON value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    /// Replaces whatever is stored under `key`.
    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;
    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Identity contract for the console operator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Checks the credentials and, on success, opens a session.
    /// Wrong credentials yield `Ok(None)`.
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<Option<SessionUser>>;

    /// Drops the current session, if any.
    async fn logout(&self) -> anyhow::Result<()>;

    async fn is_authenticated(&self) -> bool;

    /// The user-info blob of the current session.
    async fn current_user(&self) -> Option<SessionUser>;

    /// Whether the current user's role may open the given console route.
    async fn can_access_route(&self, path: &str) -> bool;
}
