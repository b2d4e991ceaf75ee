use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use clearance_radar::app::{self, Cli};
use clearance_radar::config::WEBHOOK_ENV;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is normal in scheduled runs
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clearance_radar=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let code = app::execute(cli, std::env::var(WEBHOOK_ENV).ok()).await;
    Ok(ExitCode::from(code))
}
