//! # fc-auth-simple
//!
//! Fixture-backed implementation of `AuthProvider`.
//! Checks credentials against a fixed user list and keeps the session (an
//! opaque random token plus the user-info blob) in the key-value store.
//! Sessions never expire and are not validated anywhere else.

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use async_trait::async_trait;
use base64::Engine;
use fc_core::access;
use fc_core::models::{Role, SessionUser, User};
use fc_core::traits::{keys, AuthProvider, KvStore};
use serde_json::Value;
use tracing::{info, warn};

/// The console's built-in accounts.
pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            email: "admin@gmail.com".into(),
            password: "admin123".into(),
            role: Role::Admin,
            name: "Admin User".into(),
        },
        User {
            id: "2".into(),
            email: "inspector@gmail.com".into(),
            password: "inspector123".into(),
            role: Role::Inspector,
            name: "Inspector User".into(),
        },
        User {
            id: "3".into(),
            email: "engineer@gmail.com".into(),
            password: "engineer123".into(),
            role: Role::Engineer,
            name: "Engineer User".into(),
        },
    ]
}

pub struct SimpleAuthProvider {
    store: Arc<dyn KvStore>,
    users: Vec<User>,
}

impl SimpleAuthProvider {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_users(store, default_users())
    }

    pub fn with_users(store: Arc<dyn KvStore>, users: Vec<User>) -> Self {
        Self { store, users }
    }

    /// Replaces the password of every admin account (plaintext or an argon2
    /// PHC string).
    pub fn with_admin_password(mut self, password: &str) -> Self {
        for user in self.users.iter_mut().filter(|u| u.role == Role::Admin) {
            user.password = password.to_string();
        }
        self
    }

    /// Engineers that jobs can be assigned to.
    pub fn engineers(&self) -> Vec<SessionUser> {
        self.users
            .iter()
            .filter(|u| u.role == Role::Engineer)
            .map(SessionUser::from)
            .collect()
    }
}

/// Argon2 PHC strings are verified with argon2; anything else is a plaintext
/// fixture value compared directly.
fn verify_password(candidate: &str, stored: &str) -> bool {
    if stored.starts_with("$argon2") {
        let parsed_hash = match PasswordHash::new(stored) {
            Ok(p) => p,
            Err(_) => return false,
        };
        return Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok();
    }
    candidate == stored
}

fn generate_token() -> anyhow::Result<String> {
    let mut bytes = [0u8; 24];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| anyhow::anyhow!("failed to generate session token: {e}"))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<Option<SessionUser>> {
        let Some(user) = self
            .users
            .iter()
            .find(|u| u.email == email && verify_password(password, &u.password))
        else {
            warn!(%email, "login rejected");
            return Ok(None);
        };

        let session = SessionUser::from(user);
        self.store
            .set(keys::AUTH_TOKEN, Value::String(generate_token()?))
            .await?;
        self.store
            .set(keys::USER_DATA, serde_json::to_value(&session)?)
            .await?;
        info!(%email, role = %session.role, "operator logged in");
        Ok(Some(session))
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.store.remove(keys::AUTH_TOKEN).await?;
        self.store.remove(keys::USER_DATA).await?;
        info!("operator logged out");
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        match self.store.get(keys::AUTH_TOKEN).await {
            Ok(Some(Value::String(token))) => !token.is_empty(),
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "could not read session token");
                false
            }
        }
    }

    async fn current_user(&self) -> Option<SessionUser> {
        match self.store.get(keys::USER_DATA).await {
            Ok(Some(value)) => serde_json::from_value(value)
                .map_err(|e| warn!(error = %e, "stored user data is malformed"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read user data");
                None
            }
        }
    }

    async fn can_access_route(&self, path: &str) -> bool {
        let role = self.current_user().await.map(|u| u.role);
        access::can_access(role, path)
    }
}
