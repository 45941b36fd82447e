use std::sync::Arc;

use fc_config::AuthConfig;
use fc_core::error::AppError;
use fc_core::traits::{AuthProvider, KvStore};

use crate::output::Output;

#[cfg(feature = "auth-simple")]
use fc_auth_simple::SimpleAuthProvider;
#[cfg(feature = "auth-simple")]
use secrecy::ExposeSecret;

#[derive(Debug)]
pub enum AuthCommand {
    Login { email: String, password: String },
    Logout,
    Whoami,
    CanAccess { route: String },
}

#[cfg(feature = "auth-simple")]
fn provider(store: Arc<dyn KvStore>, config: &AuthConfig) -> anyhow::Result<Box<dyn AuthProvider>> {
    let mut provider = SimpleAuthProvider::new(store);
    if let Some(password) = &config.admin_password {
        provider = provider.with_admin_password(password.expose_secret());
    }
    Ok(Box::new(provider))
}

#[cfg(not(feature = "auth-simple"))]
fn provider(_store: Arc<dyn KvStore>, _config: &AuthConfig) -> anyhow::Result<Box<dyn AuthProvider>> {
    anyhow::bail!("authentication is not compiled into this binary")
}

pub async fn run(
    store: Arc<dyn KvStore>,
    config: &AuthConfig,
    out: Output,
    command: AuthCommand,
) -> anyhow::Result<()> {
    let auth = provider(store, config)?;
    match command {
        AuthCommand::Login { email, password } => {
            let user = auth
                .login(&email, &password)
                .await?
                .ok_or_else(|| AppError::Unauthorized("invalid email or password".into()))?;
            out.show(&user, |u| vec![format!("signed in as {} ({})", u.name, u.role)])
        }
        AuthCommand::Logout => {
            auth.logout().await?;
            out.status(true, "signed out")
        }
        AuthCommand::Whoami => match auth.current_user().await {
            Some(user) => out.show(&user, |u| vec![format!("{} <{}> {}", u.name, u.email, u.role)]),
            None => Err(AppError::Unauthorized("no active session".into()).into()),
        },
        AuthCommand::CanAccess { route } => {
            let allowed = auth.can_access_route(&route).await;
            let verdict = if allowed { "allowed" } else { "denied" };
            out.show(
                &serde_json::json!({ "route": route, "allowed": allowed }),
                |_| vec![format!("{route}: {verdict}")],
            )
        }
    }
}
