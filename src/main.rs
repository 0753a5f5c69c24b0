//! Bridge price resolver - command line entry point
//!
//! Resolves USD prices and market caps for tokens bridged between Base and
//! Solana, and browses bridge activity recorded by the indexer.
use anyhow::Context;
use bridge_price_resolver::commands::{self, Cli};
use bridge_price_resolver::{PricingConfig, ServiceContainer};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting bridge price resolver v{}", bridge_price_resolver::VERSION);

    let cli = Cli::parse();

    let config = PricingConfig::from_env().context("Failed to load configuration")?;
    let services = Arc::new(
        ServiceContainer::new(config).context("Failed to initialize services")?,
    );

    commands::run(cli, services).await
}
