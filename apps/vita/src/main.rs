mod cli;
mod config;
mod errors;
mod layout;
mod loader;
mod models;
mod output;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Args;
use crate::config::Config;

fn main() -> Result<()> {
    // Environment first so the log level can come from .env
    let config = Config::from_env();
    let args = Args::parse();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.log_level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vita v{}", env!("CARGO_PKG_VERSION"));

    cli::run(&args, &config)?;
    Ok(())
}
