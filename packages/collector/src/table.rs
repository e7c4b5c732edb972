//! Tabular and plain-text views of extracted records.

use serde::Serialize;
use serde_json::Value;

use crate::types::record::Record;

/// Records laid out as rows under a shared header.
///
/// Columns are the union of all record keys, in first-seen order. A record
/// lacking a column gets an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for name in record.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as tab-separated values with a header line.
    pub fn to_tsv(&self) -> String {
        let mut out = self.columns.join("\t");
        for row in &self.rows {
            out.push('\n');
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.replace(['\t', '\n'], " "))
                .collect();
            out.push_str(&cells.join("\t"));
        }
        out
    }
}

/// Display text for one JSON value.
///
/// Strings are shown as-is, arrays of scalars are joined with `"; "`,
/// and anything nested falls back to compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => items
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Plain-text rendering used as the `content` of saved extractions.
///
/// A lone single-field record (a summary) becomes `"{key}:\n\n{value}"`.
/// Anything else becomes numbered `Item N:` blocks with one `key: value`
/// line per field, separated by blank lines.
pub fn format_records_as_text(records: &[Record]) -> String {
    if let [only] = records {
        if let Some((key, value)) = only.single_field() {
            return format!("{}:\n\n{}", key, cell_text(value));
        }
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut block = format!("Item {}:", i + 1);
            for (key, value) in record.fields() {
                block.push('\n');
                block.push_str(key);
                block.push_str(": ");
                block.push_str(&cell_text(value));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
