//! Scripted LLM provider for tests.
//!
//! [`ScriptedProvider`] replays pre-queued turns of stream chunks, so
//! loop and gateway tests run the real streaming path without a
//! network. Each call to `stream`/`send` consumes one queued turn and
//! records the messages it was called with.

use crate::{Choice, Delta, General, LLM, Message, Response, Role, StreamChunk};
use anyhow::Result;
use futures_core::Stream;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

#[derive(Default)]
struct Inner {
    turns: VecDeque<Vec<StreamChunk>>,
    last: Option<Vec<StreamChunk>>,
    repeat_last: bool,
    requests: Vec<Vec<Message>>,
}

/// An LLM provider that replays scripted turns.
///
/// # Panics
///
/// Panics when a turn is requested after the script is exhausted,
/// unless [`ScriptedProvider::repeat_last`] was enabled.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedProvider {
    /// Create a provider with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a turn of raw stream chunks.
    pub fn push_turn(&self, chunks: Vec<StreamChunk>) {
        self.inner.lock().turns.push_back(chunks);
    }

    /// Queue a plain text turn ending with a `stop` finish reason.
    pub fn push_text_turn(&self, text: &str) {
        self.push_turn(vec![
            StreamChunk::text(text),
            StreamChunk::finish(crate::FinishReason::Stop),
        ]);
    }

    /// Replay the last queued turn forever once the script runs out.
    pub fn repeat_last(&self) {
        self.inner.lock().repeat_last = true;
    }

    /// The message lists this provider has been called with, in order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.inner.lock().requests.clone()
    }

    fn next_turn(&self, messages: &[Message]) -> Vec<StreamChunk> {
        let mut inner = self.inner.lock();
        inner.requests.push(messages.to_vec());
        match inner.turns.pop_front() {
            Some(turn) => {
                inner.last = Some(turn.clone());
                turn
            }
            None if inner.repeat_last => inner
                .last
                .clone()
                .expect("repeat_last enabled but no turn was ever queued"),
            None => panic!("ScriptedProvider script exhausted"),
        }
    }
}

impl LLM for ScriptedProvider {
    type ChatConfig = General;

    async fn send(&self, _config: &General, messages: &[Message]) -> Result<Response> {
        let turn = self.next_turn(messages);
        let mut builder = Message::builder(Role::Assistant);
        let mut finish_reason = None;
        for chunk in &turn {
            builder.accept(chunk);
            if let Some(reason) = chunk.reason() {
                finish_reason = Some(*reason);
            }
        }
        let message = builder.build();
        Ok(Response {
            meta: Default::default(),
            choices: vec![Choice {
                index: 0,
                message: Delta {
                    role: Some(Role::Assistant),
                    content: Some(message.content),
                    reasoning_content: None,
                    tool_calls: if message.tool_calls.is_empty() {
                        None
                    } else {
                        Some(message.tool_calls.into_vec())
                    },
                    tool_results: None,
                },
                finish_reason,
            }],
            usage: None,
        })
    }

    fn stream(
        &self,
        _config: General,
        messages: &[Message],
        _usage: bool,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let turn = self.next_turn(messages);
        async_stream::stream! {
            for chunk in turn {
                yield Ok(chunk);
            }
        }
    }
}
