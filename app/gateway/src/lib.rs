//! Gridchat HTTP gateway.
//!
//! Serves the chat SSE endpoint (`POST /chat`) and the file boundary,
//! wiring the runtime, completion provider, and plugins from TOML
//! configuration.

pub use config::{GatewayConfig, global_config_dir, scaffold_config};
pub use serve::{ServeHandle, serve_router, serve_with_config};
pub use state::AppState;

pub mod config;
pub mod relay;
pub mod routes;
mod serve;
mod state;
pub mod utils;

use anyhow::Result;
use gcore::{FileStore, General, MemoryStore};
use github::GitHubPlugin;
use linear::LinearPlugin;
use runtime::{HttpProvider, Runtime};
use sheets::SheetsPlugin;
use std::sync::Arc;
use timezone::TimezonePlugin;

/// Build the runtime from config: provider, file store, and plugins.
///
/// Plugins with absent credentials still register — their tool
/// definitions stay visible and execution fails informatively.
pub fn build_runtime(config: &GatewayConfig) -> Result<Runtime<HttpProvider>> {
    let client = reqwest::Client::new();
    let endpoint = config.completion_endpoint();
    let provider = if config.llm.api_key.is_empty() {
        tracing::warn!("no completion API key configured; connecting unauthenticated");
        HttpProvider::no_auth(client.clone(), endpoint)
    } else {
        HttpProvider::bearer(client.clone(), &config.llm.api_key, endpoint)?
    };
    tracing::info!("provider initialized for model {}", config.llm.model);

    let files: Arc<dyn FileStore> = Arc::new(MemoryStore::new());
    let mut runtime = Runtime::new(
        General::new(config.llm.model.clone()),
        provider,
        Arc::clone(&files),
    );

    runtime.register_file_plugin(Arc::new(SheetsPlugin::new(files)));
    runtime.register_utility(Arc::new(TimezonePlugin::new()));
    runtime.register_utility(Arc::new(GitHubPlugin::new(
        client.clone(),
        config.plugins.github_token.clone(),
    )));
    runtime.register_utility(Arc::new(LinearPlugin::new(
        client,
        config.plugins.linear_token.clone(),
    )));

    Ok(runtime)
}
