//! Chat completion response types.

use crate::{Message, Role, tool::ToolCall};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Common metadata shared between streaming and non-streaming completions.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionMeta {
    /// A unique identifier for the chat completion.
    #[serde(default)]
    pub id: String,

    /// The object type.
    #[serde(default)]
    pub object: String,

    /// Unix timestamp (in seconds) of when the response was created.
    #[serde(default)]
    pub created: u64,

    /// The model used for the completion.
    #[serde(default)]
    pub model: String,
}

/// Message content in a completion response.
///
/// Used for both streaming deltas and non-streaming response messages.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Delta {
    /// The role of the message author.
    pub role: Option<Role>,

    /// The content of the message.
    pub content: Option<String>,

    /// The reasoning content.
    pub reasoning_content: Option<String>,

    /// Tool calls made by the model.
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Tool results executed server-side by the completion vendor and
    /// streamed back, keyed to a prior tool call id.
    pub tool_results: Option<Vec<ToolResultDelta>>,
}

/// A server-side tool result tied to a call id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolResultDelta {
    /// The id of the tool call this result answers.
    pub tool_call_id: CompactString,

    /// The result content (JSON string).
    pub content: String,
}

/// A chat completion response from the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Completion metadata.
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices.
    pub choices: Vec<Choice>,

    /// Token usage statistics.
    pub usage: Option<Usage>,
}

impl Response {
    /// Build the assistant message from the first choice.
    pub fn message(&self) -> Option<Message> {
        let choice = self.choices.first()?;
        Some(Message::assistant(
            choice.message.content.clone().unwrap_or_default(),
            choice.message.tool_calls.as_deref(),
        ))
    }

    /// Get the content of the first choice.
    pub fn content(&self) -> Option<&String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
    }

    /// Get the tool calls from the first choice.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.choices
            .first()
            .and_then(|choice| choice.message.tool_calls.as_deref())
    }

    /// Get the reason the model stopped generating.
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}

/// A completion choice.
///
/// Non-streaming responses carry the payload under `message`; stream
/// chunks carry it under `delta`. Both deserialize into this type.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Choice {
    /// The index of this choice in the list.
    #[serde(default)]
    pub index: u32,

    /// The generated message or delta.
    #[serde(alias = "delta")]
    pub message: Delta,

    /// The reason the model stopped generating.
    pub finish_reason: Option<FinishReason>,
}

/// The reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally.
    Stop,

    /// The model hit the max token limit.
    Length,

    /// Content was filtered.
    ContentFilter,

    /// The model is making tool calls.
    ToolCalls,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Usage {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total number of tokens used.
    #[serde(default)]
    pub total_tokens: u32,
}
