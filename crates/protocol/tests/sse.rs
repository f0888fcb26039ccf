//! SSE framing and incremental parsing tests.

use gridchat_protocol::{StreamEvent, ToolCallReport, sse};

fn chunk(text: &str) -> StreamEvent {
    StreamEvent::Chunk {
        text: text.to_string(),
    }
}

#[test]
fn frames_are_data_prefixed_json_blocks() {
    let events = [
        chunk("ab"),
        StreamEvent::ToolCall {
            id: "c1".into(),
            name: "head".to_string(),
            arguments: String::new(),
        },
        StreamEvent::Done {
            content: "ab".to_string(),
            tool_calls: vec![],
            limit_reached: false,
            aborted: false,
        },
    ];

    let mut wire = String::new();
    for event in &events {
        wire.push_str(&sse::encode(event).unwrap());
    }

    let frames: Vec<&str> = wire.split("\n\n").filter(|s| !s.is_empty()).collect();
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        let payload = frame.strip_prefix("data: ").expect("data prefix");
        let json: serde_json::Value = serde_json::from_str(payload).expect("valid json");
        assert!(json.get("type").is_some());
    }

    let first: serde_json::Value =
        serde_json::from_str(frames[0].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(first["type"], "chunk");
    assert_eq!(first["text"], "ab");
    let last: serde_json::Value =
        serde_json::from_str(frames[2].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(last["type"], "done");
}

#[test]
fn parser_round_trips_encoded_events() {
    let done = StreamEvent::Done {
        content: "hello".to_string(),
        tool_calls: vec![ToolCallReport {
            id: "c1".into(),
            name: "head".to_string(),
            arguments: "{\"n\":5}".to_string(),
            result: "{\"rows\":[]}".to_string(),
        }],
        limit_reached: true,
        aborted: false,
    };

    let wire = sse::encode(&done).unwrap();
    let mut parser = sse::EventParser::new();
    let events = parser.push(wire.as_bytes());
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Done {
            content,
            tool_calls,
            limit_reached,
            aborted,
        } => {
            assert_eq!(content, "hello");
            assert_eq!(tool_calls[0].name, "head");
            assert!(limit_reached);
            assert!(!aborted);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(!parser.has_partial());
}

#[test]
fn parser_handles_split_frames() {
    let wire = sse::encode(&chunk("hello world")).unwrap();
    let (a, b) = wire.as_bytes().split_at(7);

    let mut parser = sse::EventParser::new();
    assert!(parser.push(a).is_empty());
    assert!(parser.has_partial());

    let events = parser.push(b);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Chunk { text } if text == "hello world"));
}

#[test]
fn parser_handles_multiple_frames_in_one_push() {
    let wire = format!(
        "{}{}",
        sse::encode(&chunk("a")).unwrap(),
        sse::encode(&chunk("b")).unwrap()
    );
    let mut parser = sse::EventParser::new();
    let events = parser.push(wire.as_bytes());
    assert_eq!(events.len(), 2);
}

#[test]
fn parser_skips_done_marker_and_garbage() {
    let mut parser = sse::EventParser::new();
    let events = parser.push(b"data: [DONE]\n\ndata: {not json}\n\n: comment\n\n");
    assert!(events.is_empty());
}

#[test]
fn event_tags_are_snake_case() {
    let err = StreamEvent::Error {
        message: "boom".to_string(),
    };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "error");

    let tc = StreamEvent::ToolCall {
        id: "c1".into(),
        name: "head".to_string(),
        arguments: String::new(),
    };
    let json = serde_json::to_value(&tc).unwrap();
    assert_eq!(json["type"], "tool_call");
}
