//! Gridchat wire protocol types shared between gateway and client.

use compact_str::CompactString;
use gcore::Message;
use serde::{Deserialize, Serialize};

pub mod sse;

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "0.1";

/// A chat request posted to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation identifier (opaque to the gateway; persistence is
    /// the caller's concern).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<CompactString>,

    /// The user message for this turn.
    pub message: String,

    /// Ids of uploaded files this turn refers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<CompactString>,

    /// Prior conversation messages, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Model override for this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Whether file plugins may be attached for this turn.
    #[serde(default = "default_true")]
    pub use_plugins: bool,
}

fn default_true() -> bool {
    true
}

/// The non-streaming chat response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Full assistant text for the turn.
    pub content: String,

    /// Completed tool calls with their results.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallReport>,

    /// Whether the turn stopped at the tool-round ceiling.
    #[serde(default)]
    pub limit_reached: bool,
}

/// A completed tool call as reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallReport {
    /// The tool call id.
    pub id: CompactString,

    /// The function name.
    pub name: String,

    /// The raw argument string.
    #[serde(default)]
    pub arguments: String,

    /// The result content (JSON string), when locally known.
    #[serde(default)]
    pub result: String,
}

/// An event on the chat SSE stream.
///
/// Framed on the wire as `data: <json>\n\n`, one event per frame; the
/// terminal `done` or `error` event is always last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A text delta.
    Chunk {
        /// The delta text.
        text: String,
    },
    /// A detected tool call (name/arguments may still be partial).
    ToolCall {
        /// The tool call id.
        id: CompactString,
        /// The function name as known so far.
        name: String,
        /// The argument string as known so far.
        arguments: String,
    },
    /// Terminal event: the turn completed (possibly partially, on
    /// cancellation or ceiling hit).
    Done {
        /// Full assistant text.
        content: String,
        /// Completed tool calls with results.
        tool_calls: Vec<ToolCallReport>,
        /// Whether the tool-round ceiling was hit.
        #[serde(default)]
        limit_reached: bool,
        /// Whether the turn was cancelled mid-stream.
        #[serde(default)]
        aborted: bool,
    },
    /// Terminal event: the turn failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
