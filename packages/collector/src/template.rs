//! Document templates filled from captured items.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::table::cell_text;
use crate::types::collection::Item;

/// Text left where a template names a field the item does not have.
pub const MISSING_FIELD: &str = "[MISSING]";

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^{}\n]+)\}").unwrap();
    static ref FIELD_NAME: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

/// Fill `{field}` placeholders in `template` from `item`.
///
/// Fields come from [`Item::flat_fields`] plus `timestamp` as a
/// `YYYY-MM-DD` date. Names match case-insensitively. A known field with an
/// empty or null value renders as nothing; an unknown word-like name renders
/// as [`MISSING_FIELD`]. Other braces (`{ "json": 1 }`) are left alone.
/// Substituted values are never rescanned.
pub fn render_template(template: &str, item: &Item) -> String {
    let mut fields = item.flat_fields();
    fields.insert(
        "timestamp".into(),
        Value::String(item.timestamp.format("%Y-%m-%d").to_string()),
    );

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            let found = fields
                .iter()
                .find(|(key, _)| key.to_lowercase() == name.to_lowercase());

            match found {
                Some((_, value)) => cell_text(value),
                None if FIELD_NAME.is_match(name) => MISSING_FIELD.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
