//! Tabular-to-binary export boundary.
//!
//! Turning a table into a downloadable workbook is delegated to this
//! single function so the plugin stays decoupled from any particular
//! spreadsheet writer. The current emitter produces a tab-separated
//! byte payload behind the same signature a full workbook builder
//! would use.

use crate::table::Table;

/// Render a table as a downloadable binary.
pub fn to_workbook(table: &Table) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&table.headers.join("\t"));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out.into_bytes()
}
