//! Sheets plugin tests over an in-memory file store.

use gcore::{FileStore, MemoryStore, Plugin};
use gridchat_sheets::{SheetsPlugin, Table};
use serde_json::json;
use std::sync::Arc;

const CSV: &str = "month,total,notes\njan,42,start\nfeb,58,\"rush, big\"\nmar,51,ok\n";

async fn plugin_with_file() -> (SheetsPlugin, Arc<MemoryStore>, String) {
    let store = Arc::new(MemoryStore::new());
    let info = store.upload("sales.csv", CSV.as_bytes().to_vec()).await.unwrap();
    (SheetsPlugin::new(store.clone()), store, info.id.to_string())
}

#[tokio::test]
async fn head_returns_first_rows() {
    let (plugin, _, id) = plugin_with_file().await;
    let result = plugin
        .execute("head", json!({"file_id": id, "n": 2}))
        .await
        .unwrap();

    assert_eq!(result["headers"][1], "total");
    assert_eq!(result["rows"].as_array().unwrap().len(), 2);
    assert_eq!(result["rows"][0][0], "jan");
    assert_eq!(result["total_rows"], 3);
}

#[tokio::test]
async fn describe_summarizes_numeric_columns() {
    let (plugin, _, id) = plugin_with_file().await;
    let result = plugin.execute("describe", json!({"file_id": id})).await.unwrap();

    assert_eq!(result["rows"], 3);
    let columns = result["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["numeric"], false);
    assert_eq!(columns[1]["numeric"], true);
    assert_eq!(columns[1]["min"], 42.0);
    assert_eq!(columns[1]["max"], 58.0);
}

#[tokio::test]
async fn column_values_by_name() {
    let (plugin, _, id) = plugin_with_file().await;
    let result = plugin
        .execute("column_values", json!({"file_id": id, "column": "Total"}))
        .await
        .unwrap();

    assert_eq!(result["column"], "total");
    assert_eq!(result["values"], json!(["42", "58", "51"]));
    assert_eq!(result["truncated"], false);
}

#[tokio::test]
async fn export_stores_a_new_download() {
    let (plugin, store, id) = plugin_with_file().await;
    let result = plugin
        .execute("export_excel", json!({"file_id": id}))
        .await
        .unwrap();

    assert_eq!(result["filename"], "sales.xlsx");
    let exported = store.get(result["file_id"].as_str().unwrap()).await.unwrap();
    assert!(exported.bytes > 0);
}

#[tokio::test]
async fn missing_argument_is_an_error() {
    let (plugin, _, _) = plugin_with_file().await;
    let err = plugin.execute("head", json!({})).await.unwrap_err();
    assert!(err.to_string().contains("missing required argument"));
}

#[tokio::test]
async fn unknown_file_is_an_error() {
    let (plugin, _, _) = plugin_with_file().await;
    let err = plugin
        .execute("head", json!({"file_id": "nope"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn quoted_fields_keep_embedded_delimiters() {
    let table = Table::parse(CSV, ',').unwrap();
    assert_eq!(table.rows[1][2], "rush, big");
}

#[test]
fn doubled_quotes_unescape() {
    let table = Table::parse("a,b\n\"say \"\"hi\"\"\",2\n", ',').unwrap();
    assert_eq!(table.rows[0][0], "say \"hi\"");
}

#[test]
fn tsv_delimiter_detection() {
    assert_eq!(Table::delimiter_for("data.tsv"), '\t');
    assert_eq!(Table::delimiter_for("data.csv"), ',');
}

#[test]
fn empty_file_is_an_error() {
    assert!(Table::parse("", ',').is_err());
}
