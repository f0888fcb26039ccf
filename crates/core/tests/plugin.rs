//! Plugin contract default-method tests.

use async_trait::async_trait;
use gridchat_core::{FileInfo, FilePlugin, FileStatus, Plugin, Tool, file_extension};
use serde_json::{Value, json};

struct EchoPlugin;

#[async_trait]
impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes its arguments"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: "echo".into(),
            description: "Echoes the input".into(),
            parameters: schemars::schema_for!(String),
            strict: false,
        }]
    }

    async fn execute(&self, _function: &str, args: Value) -> anyhow::Result<Value> {
        Ok(args)
    }
}

#[async_trait]
impl FilePlugin for EchoPlugin {
    fn extensions(&self) -> &[&str] {
        &["csv", "xlsx"]
    }
}

fn file(name: &str) -> FileInfo {
    FileInfo {
        id: "f1".into(),
        filename: name.to_string(),
        bytes: 0,
        status: FileStatus::Ready,
    }
}

#[test]
fn handles_matches_declared_tool_names() {
    let plugin = EchoPlugin;
    assert!(plugin.handles("echo"));
    assert!(!plugin.handles("other"));
}

#[test]
fn can_process_matches_extension_case_insensitively() {
    let plugin = EchoPlugin;
    assert!(plugin.can_process(&file("data.csv")));
    assert!(plugin.can_process(&file("Report.XLSX")));
    assert!(!plugin.can_process(&file("notes.pdf")));
    assert!(!plugin.can_process(&file("noextension")));
}

#[test]
fn manifest_carries_functions() {
    let manifest = EchoPlugin.manifest();
    assert_eq!(manifest.name, "echo");
    assert_eq!(manifest.functions.len(), 1);
    assert_eq!(manifest.functions[0].name, "echo");

    let json = serde_json::to_value(&manifest).unwrap();
    assert_eq!(json["functions"][0]["name"], "echo");
}

#[tokio::test]
async fn execute_passes_arguments_through() {
    let result = EchoPlugin.execute("echo", json!({"a": 1})).await.unwrap();
    assert_eq!(result, json!({"a": 1}));
}

#[test]
fn file_extension_edge_cases() {
    assert_eq!(file_extension("a.csv"), Some("csv"));
    assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
    assert_eq!(file_extension("noext"), None);
    assert_eq!(file_extension(".hidden"), None);
    assert_eq!(file_extension("trailing."), None);
}
