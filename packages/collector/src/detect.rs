//! Heuristic data type detection for captured selections.
//!
//! Classifies raw selected text so the capture path can suggest which
//! collection it belongs in. Checks run in a fixed order and the first
//! match wins: email, phone, URL, currency, then note.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of data detected in a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Contact,
    /// Not produced by [`classify`]; assigned by callers that capture bare prices
    Price,
    Link,
    Product,
    Note,
}

impl DataKind {
    /// Collection name suggested for this kind of data.
    pub fn suggested_label(&self) -> &'static str {
        match self {
            DataKind::Contact => "Contacts",
            DataKind::Price => "Prices",
            DataKind::Link => "Links",
            DataKind::Product => "Products",
            DataKind::Note => "Notes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Contact => "contact",
            DataKind::Price => "price",
            DataKind::Link => "link",
            DataKind::Product => "product",
            DataKind::Note => "note",
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: DataKind,
    pub suggested_label: String,
}

impl Classification {
    fn of(kind: DataKind) -> Self {
        Self {
            kind,
            suggested_label: kind.suggested_label().to_string(),
        }
    }
}

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b"
    ).unwrap();

    // Optional leading + or (, then a run of at least ten digits and separators
    // that starts with a non-zero digit and ends with a digit
    static ref PHONE_REGEX: Regex = Regex::new(
        r"[+(]?[1-9][0-9 .\-()]{8,}[0-9]"
    ).unwrap();

    static ref URL_REGEX: Regex = Regex::new(
        r"https?://\S+"
    ).unwrap();

    static ref CURRENCY_REGEX: Regex = Regex::new(
        r"\$\s*\d+(?:[.,]\d{2})?|€\s*\d+|£\s*\d+"
    ).unwrap();
}

/// Classify selected text.
///
/// Pure and deterministic; matches anywhere in the trimmed text.
pub fn classify(text: &str) -> Classification {
    let trimmed = text.trim();

    let kind = if EMAIL_REGEX.is_match(trimmed) || PHONE_REGEX.is_match(trimmed) {
        DataKind::Contact
    } else if URL_REGEX.is_match(trimmed) {
        DataKind::Link
    } else if CURRENCY_REGEX.is_match(trimmed) {
        DataKind::Product
    } else {
        DataKind::Note
    };

    Classification::of(kind)
}
