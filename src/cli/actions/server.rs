use crate::{
    api::{self, Panel},
    auth::{AuthConfig, AuthGate, Credentials, ProviderRegistry},
    data::RestDataProvider,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: String,
    pub frontend_url: Option<String>,
    pub auth_email: String,
    pub auth_password: SecretString,
    pub login_landing: String,
    pub check_delay_ms: u64,
    pub cookie_secure: bool,
}

/// Build the auth gate from the CLI arguments.
/// # Errors
/// Returns an error if the configured credentials are invalid.
pub fn auth_gate(args: &Args) -> Result<AuthGate> {
    let credentials = Credentials::new(args.auth_email.clone(), args.auth_password.clone())
        .context("Invalid auth credentials")?;

    let config = AuthConfig::new(credentials)
        .with_login_landing(args.login_landing.clone())
        .with_check_delay(Duration::from_millis(args.check_delay_ms))
        .with_cookie_secure(args.cookie_secure);

    Ok(AuthGate::new(config, ProviderRegistry::with_defaults()))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let gate = auth_gate(&args)?;

    let api_url = Url::parse(&args.api_url)
        .with_context(|| format!("Invalid API URL: {}", args.api_url))?;
    let data = RestDataProvider::new(api_url).context("Failed to build data provider")?;

    info!(
        "Auth check delay: {}ms, login landing: {}",
        args.check_delay_ms, args.login_landing
    );

    api::new(args.port, Panel::new(gate, data), args.frontend_url).await
}
