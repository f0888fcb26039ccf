//! HTTP routes: the chat endpoint and the file boundary.

use crate::{relay, state::AppState};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gcore::{AbortHandle, FileStore, General, LLM, Message, Role};
use protocol::ChatRequest;
use runtime::AnalysisRequest;
use serde::Deserialize;
use std::sync::Arc;

/// Base system prompt for every chat turn; plugin fragments append.
const BASE_SYSTEM_PROMPT: &str = "You are a data analysis assistant. The user may upload \
    spreadsheet files and ask questions about them. Use the available tools when they help, \
    and answer precisely.";

/// Build the axum router over the shared state.
pub fn router<P>(state: AppState<P>) -> Router
where
    P: LLM<ChatConfig = General> + 'static,
{
    Router::new()
        .route("/chat", post(chat::<P>))
        .route("/files", post(upload_file::<P>).get(list_files::<P>))
        .route("/files/{id}", get(get_file::<P>).delete(delete_file::<P>))
        .route("/files/{id}/content", get(file_content::<P>))
        .route("/plugins", get(list_plugins::<P>))
        .with_state(state)
}

fn error_response(status: StatusCode, error: impl std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// The chat endpoint.
///
/// With `Accept: text/event-stream` the response relays the loop's
/// events incrementally; otherwise the same loop runs to completion
/// and returns one JSON body.
async fn chat<P>(
    State(state): State<AppState<P>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    let wants_stream = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"));

    let turn = match build_turn(&state, request).await {
        Ok(turn) => turn,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    if wants_stream {
        relay::sse_response(Arc::clone(&state.runtime), turn).into_response()
    } else {
        match state.runtime.analyze(turn, AbortHandle::new()).await {
            Ok(result) => Json(relay::to_chat_response(result)).into_response(),
            Err(e) => error_response(StatusCode::BAD_GATEWAY, e),
        }
    }
}

/// Assemble the working message list and plugin scope for one turn.
async fn build_turn<P>(state: &AppState<P>, request: ChatRequest) -> anyhow::Result<AnalysisRequest>
where
    P: LLM<ChatConfig = General> + 'static,
{
    let files = state.runtime.lookup_files(&request.file_ids).await?;
    let plugin = if request.use_plugins {
        state.runtime.resolve_plugin(&files)
    } else {
        None
    };
    if request.use_plugins && plugin.is_none() && !files.is_empty() {
        tracing::debug!(
            "no single plugin covers all {} attached files; running without plugins",
            files.len()
        );
    }

    let mut prompt = BASE_SYSTEM_PROMPT.to_string();
    for fragment in state.runtime.system_fragments(plugin.as_ref()) {
        prompt.push_str("\n\n");
        prompt.push_str(&fragment);
    }

    // The request's history is already a copy; the caller's original
    // conversation is never touched.
    let mut messages = request.history;
    if messages.first().map(|m| m.role) != Some(Role::System) {
        messages.insert(0, Message::system(prompt));
    }
    if !files.is_empty() {
        messages.push(Message::named_system(
            "files",
            serde_json::to_string(&files)?,
        ));
    }
    messages.push(Message::user(request.message));

    let mut turn = AnalysisRequest::new(messages);
    if let Some(plugin) = plugin {
        turn = turn.with_plugin(plugin);
    }
    if let Some(model) = request.model {
        turn = turn.with_model(model);
    }
    Ok(turn)
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    filename: String,
    content: String,
}

async fn upload_file<P>(
    State(state): State<AppState<P>>,
    Json(request): Json<UploadRequest>,
) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    match state
        .runtime
        .files()
        .upload(&request.filename, request.content.into_bytes())
        .await
    {
        Ok(info) => (StatusCode::CREATED, Json(info)).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

async fn list_files<P>(State(state): State<AppState<P>>) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    match state.runtime.files().list().await {
        Ok(files) => Json(files).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

async fn get_file<P>(State(state): State<AppState<P>>, Path(id): Path<String>) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    match state.runtime.files().get(&id).await {
        Ok(info) => Json(info).into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e),
    }
}

async fn file_content<P>(State(state): State<AppState<P>>, Path(id): Path<String>) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    match state.runtime.files().content(&id).await {
        Ok(content) => content.into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e),
    }
}

async fn delete_file<P>(State(state): State<AppState<P>>, Path(id): Path<String>) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    match state.runtime.files().delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e),
    }
}

async fn list_plugins<P>(State(state): State<AppState<P>>) -> Response
where
    P: LLM<ChatConfig = General> + 'static,
{
    Json(state.runtime.manifests()).into_response()
}
