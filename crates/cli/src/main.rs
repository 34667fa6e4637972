//! Command-line client for the cinerate movie rating backend.

mod cli;
mod commands;

use cinerate_common::Config;
use cinerate_common::config::LogConfig;
use cinerate_core::AppContext;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
/// Logs go to stderr so command output stays clean.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.log);
    debug!(base_url = %config.api.base_url, "Loaded configuration");

    let ctx = AppContext::init(&config).await?;
    commands::run(&ctx, cli.command).await?;

    Ok(())
}
