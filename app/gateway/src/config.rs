//! Gateway configuration loaded from TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "gridchat";

/// Config filename.
pub const CONFIG_FILE: &str = "gridchat.toml";

/// Resolve the global configuration directory (`~/.config/gridchat/`
/// on unix).
pub fn global_config_dir() -> std::path::PathBuf {
    dirs::config_dir()
        .expect("no platform config directory")
        .join(CONFIG_DIR)
}

/// Top-level gateway configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion API configuration.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Per-plugin credentials (each optional).
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Server configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Completion API configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,
    /// API key (supports `${ENV_VAR}` expansion). Empty disables
    /// authentication (e.g. a local OpenAI-compatible server).
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Optional plugin credentials.
///
/// A plugin with an absent credential still registers; it exposes its
/// tool definitions and fails informatively at execute time.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// GitHub API token.
    pub github_token: Option<String>,
    /// Linear API token.
    pub linear_token: Option<String>,
}

impl GatewayConfig {
    /// Parse a TOML string, expanding `${ENV_VAR}` patterns in
    /// supported fields.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// The `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The chat-completions endpoint derived from the base URL.
    pub fn completion_endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.llm.base_url.trim_end_matches('/')
        )
    }
}

/// Default config file content written on first run.
pub const DEFAULT_CONFIG_TOML: &str = r#"[server]
host = "127.0.0.1"
port = 3000

[llm]
model = "gpt-4o-mini"
api_key = "${OPENAI_API_KEY}"
base_url = "https://api.openai.com/v1"

[plugins]
github_token = "${GITHUB_TOKEN}"
linear_token = "${LINEAR_TOKEN}"
"#;

/// Write the default config file if it does not exist yet.
///
/// Returns true when a new file was written.
pub fn scaffold_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
