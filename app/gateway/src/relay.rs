//! SSE relay over the analysis loop.
//!
//! The loop runs on a spawned task feeding an mpsc channel; the
//! response body is a receiver-backed stream whose drop (the client
//! disconnecting) trips the turn's abort handle. This is the only
//! path by which a client-side "stop" reaches the loop.

use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures_core::Stream;
use futures_util::StreamExt;
use gcore::{AbortHandle, General, LLM};
use protocol::{ChatResponse, StreamEvent, ToolCallReport};
use runtime::{AnalysisEvent, AnalysisRequest, AnalysisResult, CompletedToolCall, Runtime};
use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::mpsc;

/// Convert a completed tool call to its wire report.
pub fn to_report(completed: &CompletedToolCall) -> ToolCallReport {
    ToolCallReport {
        id: completed.call.id.clone(),
        name: completed.call.function.name.clone(),
        arguments: completed.call.function.arguments.clone(),
        result: completed.result.clone(),
    }
}

/// Convert an analysis result to the non-streaming response body.
pub fn to_chat_response(result: AnalysisResult) -> ChatResponse {
    ChatResponse {
        content: result.content,
        tool_calls: result.tool_calls.iter().map(to_report).collect(),
        limit_reached: result.limit_reached,
    }
}

/// Map a loop event to its wire event.
pub fn map_event(event: AnalysisEvent) -> StreamEvent {
    match event {
        AnalysisEvent::Chunk(text) => StreamEvent::Chunk { text },
        AnalysisEvent::ToolCall(call) => StreamEvent::ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        },
        AnalysisEvent::Done(result) => StreamEvent::Done {
            tool_calls: result.tool_calls.iter().map(to_report).collect(),
            content: result.content,
            limit_reached: result.limit_reached,
            aborted: result.aborted,
        },
    }
}

/// Receiver-backed event stream that aborts the turn when dropped.
pub struct EventStream {
    rx: mpsc::Receiver<Result<Event, Infallible>>,
    abort: AbortHandle,
}

impl EventStream {
    /// Wrap a receiver with the abort handle to trip on drop.
    pub fn new(rx: mpsc::Receiver<Result<Event, Infallible>>, abort: AbortHandle) -> Self {
        Self { rx, abort }
    }
}

impl Stream for EventStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Run a turn and relay its events as an SSE response.
///
/// Every event is one `data: <json>\n\n` frame; the terminal
/// `done`/`error` frame is always last.
pub fn sse_response<P>(
    runtime: Arc<Runtime<P>>,
    request: AnalysisRequest,
) -> Sse<KeepAliveStream<EventStream>>
where
    P: LLM<ChatConfig = General> + 'static,
{
    let abort = AbortHandle::new();
    let guard = abort.clone();
    let (tx, rx) = mpsc::channel(64);

    tokio::spawn(async move {
        let stream = runtime.stream(request, abort);
        futures_util::pin_mut!(stream);

        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(event) => map_event(event),
                Err(e) => {
                    tracing::error!("analysis turn failed: {e:?}");
                    StreamEvent::Error {
                        message: e.to_string(),
                    }
                }
            };
            let terminal = matches!(
                event,
                StreamEvent::Done { .. } | StreamEvent::Error { .. }
            );

            match Event::default().json_data(&event) {
                Ok(frame) => {
                    if tx.send(Ok(frame)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("failed to serialize stream event: {e}");
                    break;
                }
            }
            if terminal {
                break;
            }
        }
    });

    Sse::new(EventStream::new(rx, guard)).keep_alive(KeepAlive::default())
}
