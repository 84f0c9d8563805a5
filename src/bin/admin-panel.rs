use admin_panel::cli::{self, telemetry};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    let result = action.execute().await;

    telemetry::shutdown_tracer();

    result
}
