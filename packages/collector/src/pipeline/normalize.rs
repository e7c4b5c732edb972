//! Response normalization - turn free-form model output into records.
//!
//! Models are asked for a bare JSON array of objects but routinely wrap it
//! in markdown fences, return a lone object, or return an array of strings.
//! Everything that parses as JSON is coerced into the canonical shape: an
//! ordered list of string-keyed records.

use serde_json::Value;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::types::record::Record;

/// Normalize model output into records.
///
/// An empty array is a valid "nothing found" answer. Unparseable text is
/// reported as [`ExtractionError::MalformedJson`] with the raw response
/// attached.
pub fn normalize_response(raw: &str) -> Result<Vec<Record>> {
    let json_text = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(json_text).map_err(|source| ExtractionError::MalformedJson {
            raw: raw.to_string(),
            source,
        })?;

    let records = into_records(value);
    debug!(record_count = records.len(), "Normalized AI response");
    Ok(records)
}

/// Strip a surrounding markdown code fence, with or without a language tag.
///
/// Text that does not start with a fence is returned trimmed but otherwise
/// unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the language tag ("json", "JSON", "json5", ...)
    let tag_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];

    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Coerce any JSON value into records.
fn into_records(value: Value) -> Vec<Record> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => vec![other],
    };

    if matches!(items.first(), Some(Value::String(_))) {
        return items.into_iter().map(Record::extracted_result).collect();
    }

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(Record::from(map)),
            Value::Null => None,
            other => Some(Record::extracted_result(other)),
        })
        .collect()
}
