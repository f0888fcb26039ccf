//! Spreadsheet/CSV analysis file plugin.
//!
//! Selected when every file in a chat turn is a spreadsheet type.
//! Reads file content through the [`FileStore`] boundary and exposes
//! row/column inspection plus workbook export to the model.

pub use table::{NumericStats, Table};

use anyhow::Result;
use async_trait::async_trait;
use gcore::{FileInfo, FilePlugin, FileStore, Plugin, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

mod export;
mod table;

/// Maximum values returned by `column_values`.
const MAX_COLUMN_VALUES: usize = 50;

/// Spreadsheet analysis over uploaded csv/tsv/xlsx files.
pub struct SheetsPlugin {
    files: Arc<dyn FileStore>,
}

impl SheetsPlugin {
    /// Create the plugin over the given file store.
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    async fn load(&self, file_id: &str) -> Result<(FileInfo, Table)> {
        let info = self.files.get(file_id).await?;
        let content = self.files.content(file_id).await?;
        let table = Table::parse(&content, Table::delimiter_for(&info.filename))?;
        Ok((info, table))
    }
}

fn arg<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing required argument '{name}'"))
}

fn file_id_schema() -> schemars::Schema {
    schemars::json_schema!({
        "type": "object",
        "properties": {
            "file_id": {
                "type": "string",
                "description": "Id of an uploaded file"
            }
        },
        "required": ["file_id"]
    })
}

#[async_trait]
impl Plugin for SheetsPlugin {
    fn name(&self) -> &str {
        "sheets"
    }

    fn description(&self) -> &str {
        "Inspect and export uploaded spreadsheet/CSV files"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "head".into(),
                description: "First rows of a file".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "file_id": {
                            "type": "string",
                            "description": "Id of an uploaded file"
                        },
                        "n": {
                            "type": "integer",
                            "description": "Number of rows to return",
                            "default": 5
                        }
                    },
                    "required": ["file_id"]
                }),
                strict: false,
            },
            Tool {
                name: "describe".into(),
                description: "Row count, columns, and numeric summaries of a file".into(),
                parameters: file_id_schema(),
                strict: false,
            },
            Tool {
                name: "column_values".into(),
                description: "Values of one column".into(),
                parameters: schemars::json_schema!({
                    "type": "object",
                    "properties": {
                        "file_id": {
                            "type": "string",
                            "description": "Id of an uploaded file"
                        },
                        "column": {
                            "type": "string",
                            "description": "Column name"
                        }
                    },
                    "required": ["file_id", "column"]
                }),
                strict: false,
            },
            Tool {
                name: "export_excel".into(),
                description: "Export a file as a downloadable workbook".into(),
                parameters: file_id_schema(),
                strict: false,
            },
        ]
    }

    fn system_prompt(&self) -> Option<String> {
        Some(
            "The user has uploaded spreadsheet files. Use the sheets tools to inspect \
             them before answering questions about their contents."
                .to_string(),
        )
    }

    async fn execute(&self, function: &str, args: Value) -> Result<Value> {
        match function {
            "head" => {
                let (_, table) = self.load(arg(&args, "file_id")?).await?;
                let n = args.get("n").and_then(Value::as_u64).unwrap_or(5) as usize;
                Ok(json!({
                    "headers": table.headers,
                    "rows": table.rows.iter().take(n).collect::<Vec<_>>(),
                    "total_rows": table.rows.len(),
                }))
            }
            "describe" => {
                let (info, table) = self.load(arg(&args, "file_id")?).await?;
                let columns: Vec<Value> = table
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(i, name)| match table.numeric_stats(i) {
                        Some(stats) => json!({
                            "name": name,
                            "numeric": true,
                            "count": stats.count,
                            "min": stats.min,
                            "max": stats.max,
                            "mean": stats.mean,
                        }),
                        None => json!({ "name": name, "numeric": false }),
                    })
                    .collect();
                Ok(json!({
                    "filename": info.filename,
                    "rows": table.rows.len(),
                    "columns": columns,
                }))
            }
            "column_values" => {
                let (_, table) = self.load(arg(&args, "file_id")?).await?;
                let column = arg(&args, "column")?;
                let index = table
                    .column_index(column)
                    .ok_or_else(|| anyhow::anyhow!("no column named '{column}'"))?;
                let values = table.column_values(index);
                Ok(json!({
                    "column": table.headers[index],
                    "values": values.iter().take(MAX_COLUMN_VALUES).collect::<Vec<_>>(),
                    "truncated": values.len() > MAX_COLUMN_VALUES,
                }))
            }
            "export_excel" => {
                let (info, table) = self.load(arg(&args, "file_id")?).await?;
                let data = export::to_workbook(&table);
                let stem = info
                    .filename
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .unwrap_or(&info.filename);
                let exported = self
                    .files
                    .upload(&format!("{stem}.xlsx"), data)
                    .await?;
                Ok(json!({
                    "file_id": exported.id,
                    "filename": exported.filename,
                    "bytes": exported.bytes,
                }))
            }
            other => anyhow::bail!("unknown function '{other}'"),
        }
    }
}

#[async_trait]
impl FilePlugin for SheetsPlugin {
    fn extensions(&self) -> &[&str] {
        &["csv", "tsv", "xlsx"]
    }
}
