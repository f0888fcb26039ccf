//! Minimal delimited-text table model.

use anyhow::Result;

/// A parsed table: header row plus data rows.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names from the first row.
    pub headers: Vec<String>,
    /// Data rows, each with one cell per column.
    pub rows: Vec<Vec<String>>,
}

/// Summary statistics for a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    /// Count of numeric cells.
    pub count: usize,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
}

impl Table {
    /// Parse delimited text. The first record is the header row.
    ///
    /// Handles quoted fields with embedded delimiters, newlines, and
    /// doubled quotes.
    pub fn parse(text: &str, delimiter: char) -> Result<Self> {
        let mut records: Vec<Vec<String>> = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut quoted = false;

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if quoted {
                match ch {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => quoted = false,
                    other => field.push(other),
                }
                continue;
            }
            match ch {
                '"' if field.is_empty() => quoted = true,
                '\r' => {}
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                c if c == delimiter => record.push(std::mem::take(&mut field)),
                other => field.push(other),
            }
        }
        if !field.is_empty() || !record.is_empty() {
            record.push(field);
            records.push(record);
        }

        // Drop fully-empty trailing records.
        records.retain(|r| !(r.len() == 1 && r[0].is_empty()));

        let mut iter = records.into_iter();
        let headers = iter
            .next()
            .ok_or_else(|| anyhow::anyhow!("file has no header row"))?;
        Ok(Self {
            headers,
            rows: iter.collect(),
        })
    }

    /// Pick the delimiter for a filename (`.tsv` means tabs).
    pub fn delimiter_for(filename: &str) -> char {
        if filename.to_ascii_lowercase().ends_with(".tsv") {
            '\t'
        } else {
            ','
        }
    }

    /// Index of a column by name (case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Values of the given column, row order preserved.
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).map(String::as_str))
            .collect()
    }

    /// Numeric summary of a column; `None` when no cell parses as a
    /// number.
    pub fn numeric_stats(&self, index: usize) -> Option<NumericStats> {
        let values: Vec<f64> = self
            .column_values(index)
            .iter()
            .filter_map(|v| v.trim().parse::<f64>().ok())
            .collect();
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;
        Some(NumericStats {
            count,
            min,
            max,
            mean,
        })
    }
}
