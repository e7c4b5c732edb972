//! Field mapping - projecting captured items onto export columns.
//!
//! A [`FieldMapping`] pairs item fields (see [`Item::flat_fields`]) with the
//! target columns of an export. [`auto_map`] guesses the pairs from one
//! sample item; [`apply_mapping`] turns items into records keyed by target
//! column, ready for [`RecordTable`](crate::table::RecordTable).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::types::collection::Item;
use crate::types::record::Record;

/// Ordered `source field -> target column` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pairs: Vec<(String, String)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `target`, replacing any earlier target for `source`.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        match self.pairs.iter_mut().find(|(s, _)| *s == source) {
            Some(pair) => pair.1 = target,
            None => self.pairs.push((source, target)),
        }
    }

    pub fn with(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(source, target);
        self
    }

    /// Target column for `source`, if mapped.
    pub fn target(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Guess a mapping from the first item's fields.
///
/// A field maps to the first target column where either name contains the
/// other, ignoring case. Fields with no such column are left unmapped, and
/// blank target names never match.
pub fn auto_map<S: AsRef<str>>(items: &[Item], target_columns: &[S]) -> FieldMapping {
    let mut mapping = FieldMapping::new();
    let Some(sample) = items.first() else {
        return mapping;
    };

    let targets: Vec<(&str, String)> = target_columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.trim().is_empty())
        .map(|t| (t, t.to_lowercase()))
        .collect();

    for source in sample.flat_fields().keys() {
        let source_lower = source.to_lowercase();
        let matched = targets.iter().find(|(_, target_lower)| {
            source_lower.contains(target_lower.as_str())
                || target_lower.contains(source_lower.as_str())
        });
        if let Some((target, _)) = matched {
            mapping.insert(source.clone(), *target);
        }
    }

    debug!(
        mapped = mapping.len(),
        targets = targets.len(),
        "Auto-mapped item fields"
    );
    mapping
}

/// Project each item onto the mapping's target columns.
///
/// Besides the flattened fields, `timestamp` (RFC 3339) is available as a
/// source. A mapped field the item lacks becomes `null`; pairs with a blank
/// target are skipped.
pub fn apply_mapping(items: &[Item], mapping: &FieldMapping) -> Vec<Record> {
    items
        .iter()
        .map(|item| {
            let mut flat = item.flat_fields();
            flat.insert("timestamp".into(), Value::String(item.timestamp.to_rfc3339()));

            mapping
                .iter()
                .filter(|(_, target)| !target.trim().is_empty())
                .fold(Record::new(), |record, (source, target)| {
                    record.with_field(target, flat.get(source).cloned().unwrap_or(Value::Null))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RecordTable;
    use crate::types::collection::{ItemType, PageSource};
    use serde_json::json;

    fn contact(name: &str, email: &str) -> Item {
        Item::new(ItemType::Contact)
            .with_data("full_name", name)
            .with_data("email", email)
            .with_data("notes", "met at conf")
            .with_source(PageSource::new("https://example.com/team").with_title("Team"))
    }

    #[test]
    fn test_auto_map_matches_by_containment() {
        let items = vec![contact("Ada", "ada@example.com")];
        let mapping = auto_map(&items, &["Name", "Email", "URL", "Company"]);

        assert_eq!(mapping.target("full_name"), Some("Name"));
        assert_eq!(mapping.target("email"), Some("Email"));
        assert_eq!(mapping.target("source_url"), Some("URL"));
        assert_eq!(mapping.target("notes"), None);
        assert_eq!(
            mapping.iter().map(|(s, _)| s).collect::<Vec<_>>(),
            vec!["full_name", "email", "source_url"]
        );
    }

    #[test]
    fn test_auto_map_takes_first_matching_column() {
        let items = vec![Item::new(ItemType::Note).with_data("title", "x")];
        // "source_title" contains "title" too, so both fields land on it
        let mapping = auto_map(&items, &["Title", "Page Title"]);
        assert_eq!(mapping.target("title"), Some("Title"));
        assert_eq!(mapping.target("source_title"), Some("Title"));
    }

    #[test]
    fn test_auto_map_edge_cases() {
        assert!(auto_map::<&str>(&[], &["Name"]).is_empty());

        let items = vec![contact("Ada", "ada@example.com")];
        assert!(auto_map(&items, &["", "  "]).is_empty());
        assert!(auto_map::<String>(&items, &[]).is_empty());
    }

    #[test]
    fn test_apply_mapping_projects_and_fills_nulls() {
        let mut with_company = contact("Bob", "bob@example.com");
        with_company
            .enriched
            .insert("company".into(), json!("Engines Ltd"));
        let items = vec![contact("Ada", "ada@example.com"), with_company];

        let mapping = FieldMapping::new()
            .with("full_name", "Name")
            .with("company", "Company")
            .with("email", "")
            .with("source_url", "Link");

        let records = apply_mapping(&items, &mapping);
        assert_eq!(records.len(), 2);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([
                {"Name": "Ada", "Company": null, "Link": "https://example.com/team"},
                {"Name": "Bob", "Company": "Engines Ltd", "Link": "https://example.com/team"}
            ])
        );

        let table = RecordTable::from_records(&records);
        assert_eq!(table.columns, vec!["Name", "Company", "Link"]);
        assert_eq!(table.rows[0][1], "");
    }

    #[test]
    fn test_apply_mapping_exposes_timestamp() {
        let item = contact("Ada", "ada@example.com");
        let mapping = FieldMapping::new().with("timestamp", "Captured");

        let records = apply_mapping(std::slice::from_ref(&item), &mapping);
        assert_eq!(
            records[0].get("Captured"),
            Some(&json!(item.timestamp.to_rfc3339()))
        );
    }

    #[test]
    fn test_insert_replaces_target_in_place() {
        let mut mapping = FieldMapping::new().with("a", "A").with("b", "B");
        mapping.insert("a", "Alpha");
        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![("a", "Alpha"), ("b", "B")]
        );
    }
}
