//! Linear plugin configuration tests.

use gcore::Plugin;
use gridchat_linear::LinearPlugin;
use serde_json::json;

fn unconfigured() -> LinearPlugin {
    LinearPlugin::new(reqwest::Client::new(), None)
}

#[test]
fn registers_without_a_token() {
    let plugin = unconfigured();
    assert!(!plugin.is_configured());
    assert_eq!(plugin.manifest().functions.len(), 2);
    assert!(plugin.handles("search_issues"));
    assert!(plugin.handles("get_issue"));
}

#[test]
fn prompt_notes_missing_configuration() {
    assert!(
        unconfigured()
            .system_prompt()
            .unwrap()
            .contains("not configured")
    );
}

#[tokio::test]
async fn execute_without_token_fails_informatively() {
    let err = unconfigured()
        .execute("search_issues", json!({"query": "crash"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not configured"));
}

#[tokio::test]
async fn unknown_function_is_an_error() {
    let err = unconfigured()
        .execute("close_issue", json!({}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown function"));
}
