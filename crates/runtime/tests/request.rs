//! Tests for the OpenAI-compatible request body.

use gcore::{Config, General, Tool, ToolChoice};
use gridchat_runtime::Request;

fn tool(name: &str) -> Tool {
    Tool {
        name: name.into(),
        description: "find docs".into(),
        parameters: schemars::schema_for!(String),
        strict: false,
    }
}

#[test]
fn request_from_general_sets_model() {
    let req = Request::from(General::new("gpt-4o"));
    assert_eq!(req.model, "gpt-4o");
    assert!(req.tools.is_none());
    assert!(req.stream.is_none());
}

#[test]
fn request_wraps_tools_in_function_envelopes() {
    let general = General::new("gpt-4o").with_tools(vec![tool("search")]);
    let req = Request::from(general);
    let tools = req.tools.expect("tools");
    assert_eq!(tools[0]["type"], "function");
    assert_eq!(tools[0]["function"]["name"], "search");
}

#[test]
fn request_serializes_tool_choice() {
    let general = General::new("gpt-4o").with_tool_choice(ToolChoice::Auto);
    let req = Request::from(general);
    assert_eq!(req.tool_choice.expect("tool_choice"), serde_json::json!("auto"));
}

#[test]
fn request_stream_sets_include_usage() {
    let req = Request::from(General::new("m")).stream(true);
    assert_eq!(req.stream, Some(true));
    let opts = req.stream_options.expect("stream_options");
    assert_eq!(opts["include_usage"], true);
}

#[test]
fn request_stream_without_usage_omits_stream_options() {
    let req = Request::from(General::new("m")).stream(false);
    assert_eq!(req.stream, Some(true));
    assert!(req.stream_options.is_none());
}

#[test]
fn empty_tool_list_is_omitted() {
    let general = General::new("m").with_tools(vec![]);
    let req = Request::from(general);
    assert!(req.tools.is_none());
}
