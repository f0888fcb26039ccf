//! Chat request/response serde tests.

use gridchat_protocol::{ChatRequest, ChatResponse};

#[test]
fn minimal_request_applies_defaults() {
    let req: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
    assert_eq!(req.message, "hi");
    assert!(req.file_ids.is_empty());
    assert!(req.history.is_empty());
    assert!(req.model.is_none());
    assert!(req.use_plugins);
}

#[test]
fn full_request_round_trips() {
    let json = r#"{
        "conversation_id": "conv-1",
        "message": "summarize",
        "file_ids": ["f1", "f2"],
        "history": [{"role": "user", "content": "earlier"}],
        "model": "gpt-4o",
        "use_plugins": false
    }"#;
    let req: ChatRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.conversation_id.as_deref(), Some("conv-1"));
    assert_eq!(req.file_ids.len(), 2);
    assert_eq!(req.history.len(), 1);
    assert!(!req.use_plugins);

    let back = serde_json::to_value(&req).unwrap();
    assert_eq!(back["file_ids"][1], "f2");
}

#[test]
fn response_serializes_default_flags() {
    let resp = ChatResponse {
        content: "done".to_string(),
        tool_calls: vec![],
        limit_reached: false,
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["content"], "done");
    assert_eq!(json["limit_reached"], false);
}
