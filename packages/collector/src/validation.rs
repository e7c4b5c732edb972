//! Data-quality checks for captured items.
//!
//! Validation never blocks a save; it only annotates the item with
//! warnings the user can review later.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::types::collection::{Item, ItemType, Validation};

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PRICE_LITERAL: Regex = Regex::new(r"^\$?\d+(,\d{3})*(\.\d{2})?$").unwrap();
}

/// Check an item and report every issue found.
pub fn validate_item(item: &Item) -> Validation {
    let mut issues = Vec::new();
    let content = item.content().map(str::trim).unwrap_or("");

    // Structured and AI items carry field data instead of a content string
    if item.item_type != ItemType::Structured && !item.is_ai_extracted() && content.is_empty() {
        issues.push("Content is empty".to_string());
    }

    if let Some(email) = item.data.get("email").filter(|v| is_present(v)) {
        let valid = email.as_str().is_some_and(|e| EMAIL_SHAPE.is_match(e));
        if !valid {
            issues.push("Potential invalid email format".to_string());
        }
    }

    let has_url = item
        .source
        .url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if !has_url {
        issues.push("Missing source URL".to_string());
    }

    if item.item_type == ItemType::Price && !PRICE_LITERAL.is_match(content) {
        issues.push("Invalid price format".to_string());
    }

    Validation::from_issues(issues)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
