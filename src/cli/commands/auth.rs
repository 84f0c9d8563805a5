use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use secrecy::SecretString;

use crate::auth::{
    credentials::{DEFAULT_EMAIL, DEFAULT_PASSWORD},
    gate::DEFAULT_LOGIN_LANDING,
};

pub const ARG_AUTH_EMAIL: &str = "auth-email";
pub const ARG_AUTH_PASSWORD: &str = "auth-password";
pub const ARG_LOGIN_LANDING: &str = "login-landing";
pub const ARG_CHECK_DELAY_MS: &str = "check-delay-ms";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[derive(Debug)]
pub struct Options {
    pub email: String,
    pub password: SecretString,
    pub login_landing: String,
    pub check_delay_ms: u64,
    pub cookie_secure: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if a defaulted argument is missing from the matches.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let email = matches
            .get_one::<String>(ARG_AUTH_EMAIL)
            .cloned()
            .context("missing required argument: --auth-email")?;
        let password = matches
            .get_one::<String>(ARG_AUTH_PASSWORD)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --auth-password")?;
        let login_landing = matches
            .get_one::<String>(ARG_LOGIN_LANDING)
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOGIN_LANDING.to_string());
        let check_delay_ms = matches
            .get_one::<u64>(ARG_CHECK_DELAY_MS)
            .copied()
            .unwrap_or(2000);

        Ok(Self {
            email,
            password,
            login_landing,
            check_delay_ms,
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_EMAIL)
                .long(ARG_AUTH_EMAIL)
                .help("Email of the single accepted identity")
                .env("PANEL_AUTH_EMAIL")
                .default_value(DEFAULT_EMAIL),
        )
        .arg(
            Arg::new(ARG_AUTH_PASSWORD)
                .long(ARG_AUTH_PASSWORD)
                .help("Password of the single accepted identity")
                .env("PANEL_AUTH_PASSWORD")
                .hide_env_values(true)
                .default_value(DEFAULT_PASSWORD),
        )
        .arg(
            Arg::new(ARG_LOGIN_LANDING)
                .long(ARG_LOGIN_LANDING)
                .help("Path returned as redirectTo after a successful login")
                .env("PANEL_LOGIN_LANDING")
                .default_value(DEFAULT_LOGIN_LANDING),
        )
        .arg(
            Arg::new(ARG_CHECK_DELAY_MS)
                .long(ARG_CHECK_DELAY_MS)
                .help("Simulated latency of the session check, in milliseconds")
                .env("PANEL_CHECK_DELAY_MS")
                .default_value("2000")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("PANEL_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}
