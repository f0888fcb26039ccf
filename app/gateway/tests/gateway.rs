//! End-to-end gateway tests: scripted provider behind the real HTTP
//! stack, driven through the client crate.

use client::ChatClient;
use futures_util::StreamExt;
use gcore::{
    FileStore, FinishReason, FunctionCall, General, MemoryStore, ScriptedProvider, StreamChunk,
    ToolCall,
};
use gridchat_gateway::{AppState, ServeHandle, routes, serve_router};
use protocol::{ChatRequest, StreamEvent};
use runtime::Runtime;
use sheets::SheetsPlugin;
use std::sync::Arc;
use timezone::TimezonePlugin;

fn call_fragment(id: &str, name: &str, args: &str) -> ToolCall {
    ToolCall {
        id: id.into(),
        index: 0,
        call_type: "function".into(),
        function: FunctionCall {
            name: name.into(),
            arguments: args.into(),
        },
    }
}

async fn start() -> (ServeHandle, ChatClient, ScriptedProvider) {
    let provider = ScriptedProvider::new();
    let files: Arc<dyn FileStore> = Arc::new(MemoryStore::new());
    let mut runtime = Runtime::new(General::new("test-model"), provider.clone(), files.clone());
    runtime.register_file_plugin(Arc::new(SheetsPlugin::new(files)));
    runtime.register_utility(Arc::new(TimezonePlugin::new()));

    let state = AppState {
        runtime: Arc::new(runtime),
    };
    let handle = serve_router(routes::router(state), "127.0.0.1:0")
        .await
        .unwrap();
    let client = ChatClient::new(format!("http://127.0.0.1:{}", handle.port));
    (handle, client, provider)
}

fn request(message: &str, file_ids: Vec<&str>) -> ChatRequest {
    ChatRequest {
        conversation_id: None,
        message: message.to_string(),
        file_ids: file_ids.into_iter().map(Into::into).collect(),
        history: Vec::new(),
        model: None,
        use_plugins: true,
    }
}

#[tokio::test]
async fn json_mode_runs_a_tool_round_trip() {
    let (handle, client, provider) = start().await;

    let info = client
        .upload("sales.csv", "month,total\njan,42\nfeb,58\n")
        .await
        .unwrap();

    provider.push_turn(vec![
        StreamChunk::tool(&[call_fragment(
            "c1",
            "head",
            &format!("{{\"file_id\":\"{}\",\"n\":2}}", info.id),
        )]),
        StreamChunk::finish(FinishReason::ToolCalls),
    ]);
    provider.push_text_turn("The file starts with January at 42.");

    let response = client
        .send(&request("what's in the file?", vec![info.id.as_str()]))
        .await
        .unwrap();

    assert_eq!(response.content, "The file starts with January at 42.");
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].name, "head");
    assert!(response.tool_calls[0].result.contains("jan"));
    assert!(!response.limit_reached);

    // The provider saw the plugin prompt and the file context message.
    let first = &provider.requests()[0];
    assert!(first[0].content.contains("spreadsheet"));
    assert!(first.iter().any(|m| m.name == "files"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn sse_mode_streams_chunks_then_done() {
    let (handle, client, provider) = start().await;
    provider.push_turn(vec![
        StreamChunk::text("Total "),
        StreamChunk::text("is 42."),
        StreamChunk::finish(FinishReason::Stop),
    ]);

    let (_abort, stream) = client.stream(&request("total?", vec![]));
    futures_util::pin_mut!(stream);

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event.unwrap());
    }

    assert!(events.len() >= 3);
    assert!(matches!(&events[0], StreamEvent::Chunk { text } if text == "Total "));
    match events.last().unwrap() {
        StreamEvent::Done {
            content, aborted, ..
        } => {
            assert_eq!(content, "Total is 42.");
            assert!(!aborted);
        }
        other => panic!("expected done, got {other:?}"),
    }

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn sse_mode_reports_tool_calls() {
    let (handle, client, provider) = start().await;

    let info = client.upload("data.csv", "a,b\n1,2\n").await.unwrap();
    provider.push_turn(vec![
        StreamChunk::tool(&[call_fragment(
            "c1",
            "describe",
            &format!("{{\"file_id\":\"{}\"}}", info.id),
        )]),
        StreamChunk::finish(FinishReason::ToolCalls),
    ]);
    provider.push_text_turn("Two columns.");

    let (_abort, stream) = client.stream(&request("describe it", vec![info.id.as_str()]));
    futures_util::pin_mut!(stream);

    let mut saw_tool_call = false;
    let mut done_calls = 0;
    while let Some(event) = stream.next().await {
        match event.unwrap() {
            StreamEvent::ToolCall { name, .. } => {
                assert_eq!(name, "describe");
                saw_tool_call = true;
            }
            StreamEvent::Done { tool_calls, .. } => done_calls = tool_calls.len(),
            _ => {}
        }
    }
    assert!(saw_tool_call);
    assert_eq!(done_calls, 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn missing_file_id_is_a_bad_request() {
    let (handle, client, _provider) = start().await;

    let err = client
        .send(&request("hi", vec!["no-such-file"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn file_boundary_round_trip() {
    let (handle, client, _provider) = start().await;

    let info = client.upload("a.csv", "x,y\n1,2\n").await.unwrap();
    assert_eq!(info.filename, "a.csv");

    let listed = client.files().await.unwrap();
    assert_eq!(listed.len(), 1);

    let content = client.file_content(&info.id).await.unwrap();
    assert!(content.starts_with("x,y"));

    client.delete_file(&info.id).await.unwrap();
    assert!(client.files().await.unwrap().is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn plugins_endpoint_lists_manifests() {
    let (handle, client, _provider) = start().await;

    let manifests: serde_json::Value =
        reqwest::get(format!("{}/plugins", client.base_url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

    let names: Vec<&str> = manifests
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"sheets"));
    assert!(names.contains(&"timezone"));

    handle.shutdown().await.unwrap();
}
