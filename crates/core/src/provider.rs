//! Provider abstraction over chat-completion APIs.

use crate::{Config, Message, Response, StreamChunk};
use anyhow::Result;
use futures_core::Stream;

/// A trait for LLM providers.
///
/// Providers are stateless apart from credentials/configuration and are
/// safe to share across concurrent requests.
pub trait LLM: Clone + Send + Sync {
    /// The chat configuration.
    type ChatConfig: Config + Send;

    /// Send a completion request and wait for the full response.
    fn send(
        &self,
        config: &Self::ChatConfig,
        messages: &[Message],
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a completion request in streaming mode.
    fn stream(
        &self,
        config: Self::ChatConfig,
        messages: &[Message],
        usage: bool,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send;
}
