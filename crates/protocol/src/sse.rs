//! Server-Sent Events framing for the chat stream.
//!
//! Wire format: one `data: <json>\n\n` frame per event. Clients parse
//! by splitting on the blank line, stripping the `data:` prefix, and
//! JSON-decoding the payload.

use crate::StreamEvent;

/// Encode an event as a single SSE frame.
pub fn encode(event: &StreamEvent) -> serde_json::Result<String> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// Incremental parser for an SSE byte stream.
///
/// Feed raw chunks as they arrive; complete frames are returned as
/// parsed events. Unparseable payloads are logged and skipped so a
/// malformed frame cannot wedge the stream.
#[derive(Debug, Default)]
pub struct EventParser {
    buffer: String,
}

impl EventParser {
    /// Create a new parser with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and drain any completed events.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..pos + 2).collect();
            for line in frame.lines() {
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim_start();
                if data.is_empty() || data == "[DONE]" {
                    continue;
                }
                match serde_json::from_str::<StreamEvent>(data) {
                    Ok(event) => events.push(event),
                    Err(e) => tracing::warn!("skipping unparseable SSE frame: {e}"),
                }
            }
        }
        events
    }

    /// Whether the buffer holds an incomplete frame.
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }
}
