//! Plugin contracts.
//!
//! A [`Plugin`] is a self-contained provider of named tool functions
//! plus the schema description handed to the completion API. Plugins
//! are stateless: constructed once at startup and shared across
//! requests. A [`FilePlugin`] additionally declares which uploaded
//! file types it can process.

use crate::{FileInfo, Tool};
use anyhow::Result;
use async_trait::async_trait;
use compact_str::CompactString;
use serde::Serialize;
use serde_json::Value;

/// A provider of named tool functions.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique plugin name (also the function-name prefix).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// The functions this plugin exposes to the completion API.
    fn tools(&self) -> Vec<Tool>;

    /// Optional system-prompt fragment attached when the plugin is in
    /// scope (e.g. usage hints, or a not-configured note).
    fn system_prompt(&self) -> Option<String> {
        None
    }

    /// Whether this plugin is attached to every chat request
    /// regardless of file context.
    fn auto_include(&self) -> bool {
        false
    }

    /// Whether this plugin owns the given (unprefixed) function name.
    fn handles(&self, function: &str) -> bool {
        self.tools().iter().any(|t| t.name == function)
    }

    /// Execute a named function with parsed JSON arguments.
    ///
    /// Errors returned here are converted to error payloads at the
    /// registry boundary; they never abort a conversation turn.
    async fn execute(&self, function: &str, args: Value) -> Result<Value>;

    /// The tool-definition payload for this plugin.
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            name: self.name().into(),
            description: self.description().to_string(),
            functions: self.tools(),
        }
    }
}

/// A plugin selected by the type of uploaded files it can process.
#[async_trait]
pub trait FilePlugin: Plugin {
    /// File extensions this plugin handles (lowercase, without dot).
    fn extensions(&self) -> &[&str];

    /// Whether this plugin can process the given file.
    ///
    /// The default matches on extension; implementations may apply
    /// richer logic (content sniffing, size limits).
    fn can_process(&self, file: &FileInfo) -> bool {
        file_extension(&file.filename)
            .map(|ext| self.extensions().contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// The plugin-level tool definition handed to the completion API.
#[derive(Debug, Clone, Serialize)]
pub struct PluginManifest {
    /// Plugin name.
    pub name: CompactString,
    /// Plugin description.
    pub description: String,
    /// Function definitions.
    pub functions: Vec<Tool>,
}

/// Extract the extension of a filename, if any.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}
