use crate::cli::{
    actions::{server::Args, Action},
    commands::{auth, ARG_API_URL, ARG_FRONTEND_URL, ARG_PORT},
};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;
    let frontend_url = matches.get_one::<String>(ARG_FRONTEND_URL).cloned();

    let auth = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_url,
        frontend_url,
        auth_email: auth.email,
        auth_password: auth.password,
        login_landing: auth.login_landing,
        check_delay_ms: auth.check_delay_ms,
        cookie_secure: auth.cookie_secure,
    }))
}
