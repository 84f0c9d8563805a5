pub mod auth;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

use crate::data::DEFAULT_API_URL;

pub const ARG_PORT: &str = "port";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_FRONTEND_URL: &str = "frontend-url";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("admin-panel")
        .about("Admin panel server")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("PANEL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the REST API serving the resources")
                .env("PANEL_API_URL")
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long(ARG_FRONTEND_URL)
                .help("Frontend URL allowed to call the panel with credentials (enables CORS)")
                .env("PANEL_FRONTEND_URL"),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}
