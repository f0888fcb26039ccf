//! Gridchat gateway binary entry point.
//!
//! Loads TOML configuration (scaffolding a default on first run),
//! builds the runtime, and serves the axum router with graceful
//! shutdown on ctrl-c.

use anyhow::Result;
use gridchat_gateway::{GatewayConfig, config, scaffold_config, serve_with_config};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Resolve the config path: first CLI arg, or the global default.
    let config_path = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| gridchat_gateway::global_config_dir().join(config::CONFIG_FILE));

    if scaffold_config(&config_path)? {
        tracing::info!("wrote default configuration to {}", config_path.display());
    }
    let config = GatewayConfig::load(&config_path)?;
    tracing::info!("loaded configuration from {}", config_path.display());

    let handle = serve_with_config(&config, &config.bind_address()).await?;

    signal::ctrl_c().await?;
    tracing::info!("received ctrl-c, shutting down");
    handle.shutdown().await?;
    tracing::info!("gateway shut down");
    Ok(())
}
