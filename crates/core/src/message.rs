//! Chat message types and the streaming message builder.

use crate::{StreamChunk, ToolCall};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// A message in the chat.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Message {
    /// The role of the message.
    pub role: Role,

    /// The content of the message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Optional message name, used for out-of-band structured context
    /// (e.g. attached-file metadata on a system message).
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub name: CompactString,

    /// The reasoning content.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning_content: String,

    /// The tool call id (set on tool-role messages, links the result
    /// back to the request).
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub tool_call_id: CompactString,

    /// The tool calls recorded on an assistant message.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tool_calls: SmallVec<[ToolCall; 4]>,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a named system message carrying structured context.
    pub fn named_system(name: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>, tool_calls: Option<&[ToolCall]>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: tool_calls
                .map(|tc| tc.iter().cloned().collect())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Create a new tool-result message.
    pub fn tool(content: impl Into<String>, call: impl Into<CompactString>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: call.into(),
            ..Default::default()
        }
    }

    /// Create a new message builder.
    pub fn builder(role: Role) -> MessageBuilder {
        MessageBuilder::new(role)
    }

    /// Estimate the number of tokens in this message (~4 chars/token).
    pub fn estimate_tokens(&self) -> usize {
        let chars = self.content.len()
            + self.reasoning_content.len()
            + self
                .tool_calls
                .iter()
                .map(|tc| tc.function.name.len() + tc.function.arguments.len())
                .sum::<usize>();
        (chars / 4).max(1)
    }
}

/// Estimate total tokens across a slice of messages.
pub fn estimate_tokens(messages: &[Message]) -> usize {
    messages.iter().map(|m| m.estimate_tokens()).sum()
}

/// Accumulates stream chunks into a complete message.
///
/// Tool-call fragments are merged by stream index; an entry becomes
/// part of the built message only once its id has arrived.
pub struct MessageBuilder {
    /// The message under construction.
    message: Message,
    /// Pending tool calls keyed by stream index.
    calls: BTreeMap<u32, ToolCall>,
}

impl MessageBuilder {
    /// Create a new message builder.
    pub fn new(role: Role) -> Self {
        Self {
            message: Message {
                role,
                ..Default::default()
            },
            calls: BTreeMap::new(),
        }
    }

    /// Accept a chunk from the stream. Returns true if the chunk
    /// carried text content.
    pub fn accept(&mut self, chunk: &StreamChunk) -> bool {
        if let Some(calls) = chunk.tool_calls() {
            for call in calls {
                let entry = self.calls.entry(call.index).or_default();
                entry.index = call.index;
                entry.merge(call);
            }
        }

        let mut has_content = false;
        if let Some(content) = chunk.content() {
            self.message.content.push_str(content);
            has_content = true;
        }

        if let Some(reason) = chunk.reasoning_content() {
            self.message.reasoning_content.push_str(reason);
        }

        has_content
    }

    /// Pending tool calls in stream-index order, including calls whose
    /// id has not arrived yet.
    pub fn pending_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.calls.values()
    }

    /// Build the message.
    ///
    /// A call whose id never arrived cannot be correlated to a result
    /// and is dropped.
    pub fn build(mut self) -> Message {
        self.message.tool_calls = self
            .calls
            .into_values()
            .filter(|call| {
                if call.id.is_empty() {
                    tracing::debug!(
                        "dropping tool call at index {} without id (function '{}')",
                        call.index,
                        call.function.name
                    );
                    return false;
                }
                true
            })
            .collect();
        self.message
    }
}

/// The role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Role {
    /// The user role.
    #[serde(rename = "user")]
    #[default]
    User,
    /// The assistant role.
    #[serde(rename = "assistant")]
    Assistant,
    /// The system role.
    #[serde(rename = "system")]
    System,
    /// The tool role.
    #[serde(rename = "tool")]
    Tool,
}
