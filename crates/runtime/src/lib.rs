//! Gridchat runtime: the agentic tool-calling loop.
//!
//! The [`Runtime`] holds the completion provider, the plugin
//! registries, and the file store. A chat turn runs as an iterative
//! loop: stream a completion, detect tool calls, execute them, feed
//! the results back, and resume — bounded by [`MAX_TOOL_ROUNDS`].
//!
//! # Example
//!
//! ```rust,ignore
//! use gcore::{General, Message, MemoryStore};
//! use runtime::{AbortHandle, AnalysisRequest, HttpProvider, Runtime};
//!
//! let provider = HttpProvider::bearer(Client::new(), &key, endpoint)?;
//! let mut runtime = Runtime::new(General::new("gpt-4o-mini"), provider, store);
//! runtime.register_utility(Arc::new(TimezonePlugin::new()));
//! let request = AnalysisRequest::new(vec![Message::user("hello")]);
//! let result = runtime.analyze(request, AbortHandle::new()).await?;
//! ```

pub use analysis::{AnalysisEvent, AnalysisResult, CompletedToolCall};
pub use gcore::AbortHandle;
pub use provider::{HttpProvider, Request};
pub use registry::{FileRegistry, UtilityRegistry};

use anyhow::Result;
use futures_core::Stream;
use futures_util::StreamExt;
use gcore::{
    Config, FileInfo, FilePlugin, FileStore, General, LLM, Message, PluginManifest, Role, Tool,
    ToolCall, ToolChoice,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

mod analysis;
mod provider;
mod registry;

/// Maximum completion rounds per chat turn.
pub const MAX_TOOL_ROUNDS: usize = 10;

/// One analysis turn: the working conversation plus plugin scope.
///
/// The runtime owns this working copy; the caller's original history
/// is never mutated.
pub struct AnalysisRequest {
    /// Conversation messages, oldest first.
    pub messages: Vec<Message>,
    /// The file plugin resolved for this turn, if any.
    pub plugin: Option<Arc<dyn FilePlugin>>,
    /// Model override for this turn.
    pub model: Option<String>,
}

impl AnalysisRequest {
    /// Create a request over the given working messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            plugin: None,
            model: None,
        }
    }

    /// Attach the resolved file plugin for this turn.
    pub fn with_plugin(mut self, plugin: Arc<dyn FilePlugin>) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// Override the model for this turn.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// The gridchat runtime — provider, registries, and file store.
///
/// Constructed once at startup and shared (read-only) across
/// concurrent chat requests.
pub struct Runtime<P> {
    provider: P,
    config: General,
    files: Arc<dyn FileStore>,
    file_plugins: FileRegistry,
    utilities: UtilityRegistry,
}

impl<P> Runtime<P>
where
    P: LLM<ChatConfig = General>,
{
    /// Create a new runtime.
    pub fn new(config: General, provider: P, files: Arc<dyn FileStore>) -> Self {
        Self {
            provider,
            config,
            files,
            file_plugins: FileRegistry::new(),
            utilities: UtilityRegistry::new(),
        }
    }

    /// Register a file plugin.
    pub fn register_file_plugin(&mut self, plugin: Arc<dyn FilePlugin>) {
        self.file_plugins.register(plugin);
    }

    /// Register a utility plugin.
    pub fn register_utility(&mut self, plugin: Arc<dyn gcore::Plugin>) {
        self.utilities.register(plugin);
    }

    /// The file store.
    pub fn files(&self) -> &Arc<dyn FileStore> {
        &self.files
    }

    /// The file plugin registry.
    pub fn file_plugins(&self) -> &FileRegistry {
        &self.file_plugins
    }

    /// The utility plugin registry.
    pub fn utilities(&self) -> &UtilityRegistry {
        &self.utilities
    }

    /// The base chat configuration.
    pub fn config(&self) -> &General {
        &self.config
    }

    /// Manifests for every registered plugin.
    pub fn manifests(&self) -> Vec<PluginManifest> {
        self.file_plugins
            .plugins()
            .map(|p| p.manifest())
            .chain(self.utilities.manifests())
            .collect()
    }

    /// Look up metadata for the given file ids.
    pub async fn lookup_files(&self, ids: &[impl AsRef<str>]) -> Result<Vec<FileInfo>> {
        let mut files = Vec::with_capacity(ids.len());
        for id in ids {
            files.push(self.files.get(id.as_ref()).await?);
        }
        Ok(files)
    }

    /// Resolve one file plugin covering all the given files, or `None`
    /// for non-plugin mode.
    pub fn resolve_plugin(&self, files: &[FileInfo]) -> Option<Arc<dyn FilePlugin>> {
        self.file_plugins.resolve_for_files(files)
    }

    /// Tool schemas in scope for a turn: the selected file plugin's
    /// functions plus every auto-include utility's.
    fn turn_tools(&self, plugin: Option<&Arc<dyn FilePlugin>>) -> Vec<Tool> {
        let mut tools = plugin.map(|p| p.tools()).unwrap_or_default();
        for utility in self.utilities.auto_included() {
            tools.extend(utility.tools());
        }
        tools
    }

    /// System-prompt fragments contributed by in-scope plugins.
    pub fn system_fragments(&self, plugin: Option<&Arc<dyn FilePlugin>>) -> Vec<String> {
        let mut fragments = Vec::new();
        if let Some(plugin) = plugin
            && let Some(fragment) = plugin.system_prompt()
        {
            fragments.push(fragment);
        }
        for utility in self.utilities.auto_included() {
            if let Some(fragment) = utility.system_prompt() {
                fragments.push(fragment);
            }
        }
        fragments
    }

    /// Resolve one tool call to a result payload.
    ///
    /// Server-streamed results win; otherwise the call dispatches to
    /// the selected file plugin or the utility registry. Every path
    /// returns a payload — a failed or unknown call yields an error
    /// payload, never a missing tool message.
    async fn dispatch(
        &self,
        call: &ToolCall,
        plugin: Option<&Arc<dyn FilePlugin>>,
        server_results: &mut BTreeMap<compact_str::CompactString, String>,
    ) -> String {
        if let Some(result) = server_results.remove(&call.id) {
            return result;
        }

        let name = call.function.name.as_str();
        if let Some(plugin) = plugin
            && plugin.handles(name)
        {
            return match plugin.execute(name, call.parsed_arguments()).await {
                Ok(value) => serde_json::to_string(&value).unwrap_or_else(|e| {
                    registry::error_payload(format!("unserializable result: {e}"))
                }),
                Err(e) => {
                    tracing::warn!("plugin '{}' failed executing '{name}': {e}", plugin.name());
                    registry::error_payload(e.to_string())
                }
            };
        }

        self.utilities
            .execute_function(name, &call.function.arguments)
            .await
    }

    /// Run an analysis turn to completion (non-streaming callers).
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        abort: AbortHandle,
    ) -> Result<AnalysisResult> {
        let stream = self.stream(request, abort);
        futures_util::pin_mut!(stream);

        let mut result = None;
        while let Some(event) = stream.next().await {
            if let AnalysisEvent::Done(done) = event? {
                result = Some(done);
            }
        }
        result.ok_or_else(|| anyhow::anyhow!("analysis stream ended without a result"))
    }

    /// Run an analysis turn, yielding incremental events.
    ///
    /// The final event is always `Done` unless the stream fails with a
    /// genuine upstream error. Cancellation and the round ceiling both
    /// yield a partial `Done`, not an error.
    pub fn stream(
        &self,
        request: AnalysisRequest,
        abort: AbortHandle,
    ) -> impl Stream<Item = Result<AnalysisEvent>> + Send + use<'_, P> {
        let base = match &request.model {
            Some(model) => self.config.clone().with_model(model.clone()),
            None => self.config.clone(),
        };
        let config = base
            .with_tools(self.turn_tools(request.plugin.as_ref()))
            .with_tool_choice(ToolChoice::Auto);

        let AnalysisRequest {
            mut messages,
            plugin,
            ..
        } = request;

        async_stream::try_stream! {
            let mut result = AnalysisResult::default();
            let mut rounds = 0;

            loop {
                if rounds == MAX_TOOL_ROUNDS {
                    tracing::warn!("tool-call round ceiling hit after {MAX_TOOL_ROUNDS} rounds");
                    result.limit_reached = true;
                    break;
                }
                rounds += 1;

                let mut builder = Message::builder(Role::Assistant);
                let mut announced: BTreeSet<u32> = BTreeSet::new();
                let mut server_results = BTreeMap::new();

                {
                    let inner = self.provider.stream(config.clone(), &messages, self.config.usage);
                    futures_util::pin_mut!(inner);

                    while let Some(chunk) = inner.next().await {
                        // Checked before processing every delta: one
                        // round's stream can outlive the client.
                        if abort.is_aborted() {
                            result.aborted = true;
                            break;
                        }
                        let chunk = chunk?;

                        if let Some(results) = chunk.tool_results() {
                            for r in results {
                                server_results.insert(r.tool_call_id.clone(), r.content.clone());
                            }
                        }

                        if builder.accept(&chunk) {
                            let text = chunk.content().unwrap_or_default().to_string();
                            result.content.push_str(&text);
                            yield AnalysisEvent::Chunk(text);
                        }

                        for call in builder.pending_calls() {
                            if !call.id.is_empty() && !announced.contains(&call.index) {
                                announced.insert(call.index);
                                yield AnalysisEvent::ToolCall(call.clone());
                            }
                        }

                        if let Some(reason) = chunk.reason() {
                            tracing::debug!("round {rounds} finished: {reason:?}");
                            break;
                        }
                    }
                    // Dropping the inner stream here cancels the
                    // underlying transfer on abort.
                }

                let message = builder.build();
                if result.aborted {
                    tracing::debug!("turn cancelled after {} rounds", rounds);
                    break;
                }

                if message.tool_calls.is_empty() {
                    messages.push(message);
                    break;
                }

                let calls: Vec<ToolCall> = message.tool_calls.to_vec();
                messages.push(message);
                for call in &calls {
                    let output = self.dispatch(call, plugin.as_ref(), &mut server_results).await;
                    result.tool_calls.push(CompletedToolCall {
                        call: call.clone(),
                        result: output.clone(),
                    });
                    messages.push(Message::tool(output, call.id.clone()));
                }
            }

            yield AnalysisEvent::Done(result);
        }
    }
}
