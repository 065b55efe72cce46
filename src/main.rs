use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod config;
mod diagram;
mod error;
mod models;
mod neo4j;
mod report;
mod utils;

use cli::Cli;
use config::AuditConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AuditConfig::load_from_path(cli.config.as_deref())?;
    cli.execute(config).await?;

    Ok(())
}
