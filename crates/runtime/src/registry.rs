//! Plugin registries.
//!
//! Two registries resolve heterogeneous tool providers uniformly: the
//! [`FileRegistry`] selects a plugin by the type of uploaded files, and
//! the [`UtilityRegistry`] routes function names (optionally prefixed
//! as `plugin.function`) to always-available utility plugins.
//!
//! Both are populated once at startup and shared read-only.

use compact_str::CompactString;
use gcore::{FileInfo, FilePlugin, Plugin, PluginManifest, file_extension};
use std::{collections::BTreeMap, sync::Arc};

/// Serialize an error message as a `{"error": ...}` payload.
pub(crate) fn error_payload(message: impl AsRef<str>) -> String {
    serde_json::json!({ "error": message.as_ref() }).to_string()
}

/// Registry of file plugins, keyed by name and by extension.
#[derive(Clone, Default)]
pub struct FileRegistry {
    by_name: BTreeMap<CompactString, Arc<dyn FilePlugin>>,
    by_extension: BTreeMap<CompactString, CompactString>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its name and all declared extensions.
    pub fn register(&mut self, plugin: Arc<dyn FilePlugin>) {
        let name = CompactString::from(plugin.name());
        for ext in plugin.extensions() {
            self.by_extension
                .insert(CompactString::from(*ext), name.clone());
        }
        self.by_name.insert(name, plugin);
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FilePlugin>> {
        self.by_name.get(name).cloned()
    }

    /// Whether the given plugin can handle the given file, either by
    /// its own `can_process` logic or via the extension table.
    fn matches(&self, plugin: &Arc<dyn FilePlugin>, file: &FileInfo) -> bool {
        if plugin.can_process(file) {
            return true;
        }
        file_extension(&file.filename)
            .map(|ext| {
                self.by_extension
                    .get(ext.to_ascii_lowercase().as_str())
                    .is_some_and(|name| name.as_str() == plugin.name())
            })
            .unwrap_or(false)
    }

    /// Resolve the plugin for a single file.
    ///
    /// Asks every plugin's `can_process` first (name order), then
    /// falls back to the extension table.
    pub fn resolve_for_file(&self, file: &FileInfo) -> Option<Arc<dyn FilePlugin>> {
        for plugin in self.by_name.values() {
            if plugin.can_process(file) {
                return Some(Arc::clone(plugin));
            }
        }
        let ext = file_extension(&file.filename)?.to_ascii_lowercase();
        let name = self.by_extension.get(ext.as_str())?;
        self.by_name.get(name).cloned()
    }

    /// Resolve one plugin covering *all* of the given files.
    ///
    /// Picks the plugin with the maximum match count and returns it
    /// only if that count equals the file count. Partial coverage
    /// yields `None`: the turn either fully commits to one plugin's
    /// tool schema or runs without plugins.
    pub fn resolve_for_files(&self, files: &[FileInfo]) -> Option<Arc<dyn FilePlugin>> {
        if files.is_empty() {
            return None;
        }

        let mut best: Option<(usize, &Arc<dyn FilePlugin>)> = None;
        for plugin in self.by_name.values() {
            let count = files.iter().filter(|f| self.matches(plugin, f)).count();
            if count > best.as_ref().map(|(c, _)| *c).unwrap_or(0) {
                best = Some((count, plugin));
            }
        }

        match best {
            Some((count, plugin)) if count == files.len() => Some(Arc::clone(plugin)),
            _ => None,
        }
    }

    /// Iterate over registered plugins in name order.
    pub fn plugins(&self) -> impl Iterator<Item = &Arc<dyn FilePlugin>> {
        self.by_name.values()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Registry of utility plugins, looked up by function name.
#[derive(Clone, Default)]
pub struct UtilityRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl UtilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Lookup scans in registration order.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Find the plugin owning the given function name.
    ///
    /// A prefixed name (`plugin.function`) only matches the plugin
    /// with that exact name, preventing cross-plugin collisions; a
    /// bare name matches the first plugin that handles it.
    pub fn find_plugin_for_function(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        if let Some((prefix, bare)) = name.split_once('.') {
            return self
                .plugins
                .iter()
                .find(|p| p.name() == prefix && p.handles(bare))
                .cloned();
        }
        self.plugins.iter().find(|p| p.handles(name)).cloned()
    }

    /// Execute a function and return its result as a JSON string.
    ///
    /// This never fails: unknown functions, malformed arguments, and
    /// plugin errors all come back as `{"error": ...}` payloads so the
    /// conversation stays well-formed.
    pub async fn execute_function(&self, name: &str, arguments: &str) -> String {
        let Some(plugin) = self.find_plugin_for_function(name) else {
            return error_payload(format!("function '{name}' not available"));
        };

        let bare = name.split_once('.').map(|(_, b)| b).unwrap_or(name);
        let args: serde_json::Value = serde_json::from_str(arguments)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));

        match plugin.execute(bare, args).await {
            Ok(value) => serde_json::to_string(&value)
                .unwrap_or_else(|e| error_payload(format!("unserializable result: {e}"))),
            Err(e) => {
                tracing::warn!("plugin '{}' failed executing '{bare}': {e}", plugin.name());
                error_payload(e.to_string())
            }
        }
    }

    /// Plugins flagged for inclusion on every chat request.
    pub fn auto_included(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter().filter(|p| p.auto_include())
    }

    /// Iterate over all registered plugins in registration order.
    pub fn plugins(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }

    /// Manifests for all registered plugins.
    pub fn manifests(&self) -> Vec<PluginManifest> {
        self.plugins.iter().map(|p| p.manifest()).collect()
    }
}
