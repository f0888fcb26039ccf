//! Shared application state for the gateway server.

use gcore::{General, LLM};
use runtime::Runtime;
use std::sync::Arc;

/// Shared state available to all request handlers.
///
/// The runtime (provider, registries, file store) is constructed once
/// at startup and immutable afterwards.
pub struct AppState<P: LLM<ChatConfig = General>> {
    /// The gridchat runtime.
    pub runtime: Arc<Runtime<P>>,
}

impl<P: LLM<ChatConfig = General>> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
        }
    }
}
