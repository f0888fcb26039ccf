//! Streaming chat completion chunks.

use crate::{
    FinishReason,
    response::{Choice, CompletionMeta, Delta, ToolResultDelta, Usage},
    tool::ToolCall,
};
use compact_str::CompactString;
use serde::Deserialize;

/// A streaming chat completion chunk.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamChunk {
    /// Completion metadata.
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices (with delta content).
    pub choices: Vec<Choice>,

    /// Token usage statistics (only in the final chunk).
    pub usage: Option<Usage>,
}

impl StreamChunk {
    /// Create a chunk carrying text content.
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_delta(Delta {
            content: Some(content.into()),
            ..Default::default()
        })
    }

    /// Create a chunk carrying tool-call fragments.
    pub fn tool(calls: &[ToolCall]) -> Self {
        Self::from_delta(Delta {
            tool_calls: Some(calls.to_vec()),
            ..Default::default()
        })
    }

    /// Create a chunk carrying a server-side tool result.
    pub fn tool_result(call_id: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self::from_delta(Delta {
            tool_results: Some(vec![ToolResultDelta {
                tool_call_id: call_id.into(),
                content: content.into(),
            }]),
            ..Default::default()
        })
    }

    /// Create a terminal chunk with a finish reason.
    pub fn finish(reason: FinishReason) -> Self {
        Self {
            choices: vec![Choice {
                finish_reason: Some(reason),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn from_delta(delta: Delta) -> Self {
        Self {
            choices: vec![Choice {
                message: delta,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Get the content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Get the reasoning content of the first choice.
    pub fn reasoning_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.reasoning_content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Get the tool-call fragments of the first choice.
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.choices
            .first()
            .and_then(|choice| choice.message.tool_calls.as_deref())
    }

    /// Get the server-side tool results of the first choice.
    pub fn tool_results(&self) -> Option<&[ToolResultDelta]> {
        self.choices
            .first()
            .and_then(|choice| choice.message.tool_results.as_deref())
    }

    /// Get the reason the model stopped generating.
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}
