mod domain;
mod clients;

mod app_system;
mod api;
mod handler;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod product_actor;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::app_system::{setup_tracing, AppConfig, ProductSystem};

/// Product catalogue over HTTP with ETag / If-Match optimistic concurrency
#[derive(Parser)]
#[command(name = "versioned_products")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // defaults -> YAML -> env (PRODUCTS__*) -> CLI
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose)?;

    setup_tracing(&config.logging.filter);

    let addr = config.bind_addr()?;
    let system = ProductSystem::new(&config.store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server bound");

    axum::serve(listener, system.router())
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("HTTP server shutting down gracefully"),
                Err(e) => error!(error = %e, "Failed to listen for ctrl-c, shutting down"),
            }
        })
        .await?;

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
