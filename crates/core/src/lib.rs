//! Core types and traits for the gridchat agent service.
//!
//! This crate provides the shared vocabulary used across the runtime,
//! plugins, and gateway: `Message`, `StreamChunk`, `Response`, `Tool`,
//! the `LLM` provider trait, the `Plugin`/`FilePlugin` contracts, and
//! the `FileStore` boundary.

pub use abort::AbortHandle;
pub use config::{Config, General};
pub use files::{FileInfo, FileStatus, FileStore, MemoryStore};
pub use message::{Message, MessageBuilder, Role, estimate_tokens};
pub use noop::NoopProvider;
pub use plugin::{FilePlugin, Plugin, PluginManifest, file_extension};
pub use provider::LLM;
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response, ToolResultDelta, Usage};
pub use stream::StreamChunk;
#[cfg(feature = "testing")]
pub use testing::ScriptedProvider;
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod abort;
mod config;
mod files;
mod message;
mod noop;
mod plugin;
mod provider;
mod response;
mod stream;
#[cfg(feature = "testing")]
mod testing;
mod tool;
