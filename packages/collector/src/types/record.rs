//! Records and the requests that produce them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ExtractionError, Result};
use crate::types::config::ExtractionConfig;

/// Field name used when the AI returns bare values instead of objects.
pub const EXTRACTED_RESULT_KEY: &str = "Extracted Result";

/// One structured object produced by the extraction pipeline.
///
/// Field names and order come from the AI response; nothing about the
/// field set is fixed across records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a bare value as `{ "Extracted Result": value }`.
    pub fn extracted_result(value: Value) -> Self {
        Self::new().with_field(EXTRACTED_RESULT_KEY, value)
    }

    /// Add a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field names in response order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fields in response order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The only field of a one-field record (the "text block" shape).
    pub fn single_field(&self) -> Option<(&str, &Value)> {
        if self.0.len() == 1 {
            self.fields().next()
        } else {
            None
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// A bounded extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Source text, already cut to the configured character limit.
    pub source_text: String,

    /// Natural-language query.
    pub query: String,

    /// Whether the verification stage applies to this text.
    pub verify: bool,
}

impl ExtractionRequest {
    /// Build a request, truncating the source text and deriving `verify`.
    ///
    /// Lengths are counted in characters, not bytes.
    pub fn new(source_text: &str, query: &str, config: &ExtractionConfig) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ExtractionError::invalid_request("query must not be empty"));
        }

        let source_text = truncate_chars(source_text, config.max_source_chars);
        let verify = source_text.chars().count() > config.verify_threshold;

        Ok(Self {
            source_text: source_text.to_string(),
            query: query.to_string(),
            verify,
        })
    }

    /// Length of the source text in characters.
    pub fn source_len(&self) -> usize {
        self.source_text.chars().count()
    }
}

/// Input to the verification prompt.
#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    pub source_text: &'a str,
    pub original_records: &'a [Record],
    pub query: &'a str,
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_as_plain_object() {
        let record = Record::new()
            .with_field("Name", "Ada")
            .with_field("Tags", json!(["math", "engines"]));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"Name": "Ada", "Tags": ["math", "engines"]}));
    }

    #[test]
    fn test_record_preserves_field_order() {
        let record: Record = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_single_field() {
        let record = Record::extracted_result(json!("hello"));
        assert_eq!(record.single_field(), Some((EXTRACTED_RESULT_KEY, &json!("hello"))));

        let record = record.with_field("Other", "x");
        assert!(record.single_field().is_none());
    }

    #[test]
    fn test_request_truncates_and_derives_verify() {
        let config = ExtractionConfig::default()
            .with_max_source_chars(20)
            .with_verify_threshold(10);

        let request = ExtractionRequest::new(&"a".repeat(50), "names", &config).unwrap();
        assert_eq!(request.source_len(), 20);
        assert!(request.verify);

        let request = ExtractionRequest::new("short", "names", &config).unwrap();
        assert!(!request.verify);
    }

    #[test]
    fn test_request_threshold_is_strict() {
        let config = ExtractionConfig::default();
        let at_threshold = "x".repeat(15_000);
        assert!(!ExtractionRequest::new(&at_threshold, "q", &config).unwrap().verify);

        let over = "x".repeat(15_001);
        assert!(ExtractionRequest::new(&over, "q", &config).unwrap().verify);
    }

    #[test]
    fn test_request_rejects_empty_query() {
        let err = ExtractionRequest::new("text", "   ", &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidRequest { .. }));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("日本語", 10), "日本語");
        assert_eq!(truncate_chars("", 3), "");
    }
}
