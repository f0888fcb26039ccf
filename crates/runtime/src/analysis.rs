//! Analysis turn types: events and results.

use gcore::ToolCall;

/// An incremental event from the analysis loop.
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    /// A text delta from the model.
    Chunk(String),
    /// A tool call whose id just became known (arguments may still be
    /// partial).
    ToolCall(ToolCall),
    /// Terminal event: the turn finished, was cancelled, or hit the
    /// tool-round ceiling. Always the last event.
    Done(AnalysisResult),
}

/// The accumulated outcome of one analysis turn.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Full assistant text across all rounds.
    pub content: String,

    /// Completed tool calls in dispatch order.
    pub tool_calls: Vec<CompletedToolCall>,

    /// Whether the turn stopped at the tool-round ceiling.
    pub limit_reached: bool,

    /// Whether the turn was cancelled mid-stream.
    pub aborted: bool,
}

/// A dispatched tool call together with its result payload.
#[derive(Debug, Clone)]
pub struct CompletedToolCall {
    /// The originating call.
    pub call: ToolCall,

    /// The result content (JSON string).
    pub result: String,
}
