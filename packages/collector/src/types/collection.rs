//! Collections and captured items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::detect::DataKind;

/// A named, persisted group of captured items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique ID; blank until assigned by a store
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// When the collection was created
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    /// Captured items, oldest first
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    /// Create an empty collection with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Assign an ID if the collection has none.
    pub fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
    }

    /// Find an item by ID.
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What kind of content an item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Contact,
    Price,
    Link,
    Product,
    Note,
    /// Free text captured without classification
    Text,
    /// Field-based data entered or mapped by the user
    Structured,
    /// Records produced by the extraction pipeline
    AiExtraction,
}

impl From<DataKind> for ItemType {
    fn from(kind: DataKind) -> Self {
        match kind {
            DataKind::Contact => ItemType::Contact,
            DataKind::Price => ItemType::Price,
            DataKind::Link => ItemType::Link,
            DataKind::Product => ItemType::Product,
            DataKind::Note => ItemType::Note,
        }
    }
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Contact => "contact",
            ItemType::Price => "price",
            ItemType::Link => "link",
            ItemType::Product => "product",
            ItemType::Note => "note",
            ItemType::Text => "text",
            ItemType::Structured => "structured",
            ItemType::AiExtraction => "ai_extraction",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a captured item came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSource {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// When the page was read
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PageSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: None,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Outcome of item validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Valid,
    Warning,
}

/// Data-quality notes attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub status: ValidationStatus,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl Validation {
    pub fn from_issues(issues: Vec<String>) -> Self {
        let status = if issues.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Warning
        };
        Self { status, issues }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// One captured unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique ID; blank until assigned by a store
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Captured fields (`content`, `html`, `structured`, `query`, ...)
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default)]
    pub source: PageSource,

    /// Fields added after capture
    #[serde(default)]
    pub enriched: Map<String, Value>,

    #[serde(default)]
    pub validation: Validation,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Item {
    /// Create an empty item of the given type with a fresh ID.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item_type,
            data: Map::new(),
            source: PageSource::default(),
            enriched: Map::new(),
            validation: Validation::default(),
            tags: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set a data field.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_source(mut self, source: PageSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Assign an ID if the item has none.
    pub fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
    }

    /// The `content` data field as text.
    pub fn content(&self) -> Option<&str> {
        self.data.get("content").and_then(Value::as_str)
    }

    /// Data and enriched fields in one map, plus `source_url` and
    /// `source_title`.
    ///
    /// Enriched values replace data values of the same name. Missing source
    /// fields are present as `null`.
    pub fn flat_fields(&self) -> Map<String, Value> {
        let mut flat = self.data.clone();
        for (key, value) in &self.enriched {
            flat.insert(key.clone(), value.clone());
        }
        flat.insert("source_url".into(), self.source.url.clone().into());
        flat.insert("source_title".into(), self.source.title.clone().into());
        flat
    }

    /// Whether the item came out of the extraction pipeline.
    pub fn is_ai_extracted(&self) -> bool {
        self.item_type == ItemType::AiExtraction || self.tags.iter().any(|t| t == "ai-extracted")
    }
}
