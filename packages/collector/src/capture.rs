//! Capture - turning selections and extraction results into saved items.
//!
//! Both save paths resolve a target collection (creating it when needed),
//! build an [`Item`], run [`validate_item`] over it, and append it.

use serde_json::Value;
use tracing::{info, warn};

use crate::detect::classify;
use crate::error::{StoreError, StoreResult};
use crate::table::format_records_as_text;
use crate::traits::store::CollectionStore;
use crate::types::collection::{Collection, Item, ItemType, PageSource};
use crate::types::record::Record;
use crate::validation::validate_item;

/// Collection that extractions land in when no target is chosen.
pub const DEFAULT_EXTRACTION_COLLECTION: &str = "AI Extractions";

/// Tag attached to every saved extraction.
pub const AI_EXTRACTED_TAG: &str = "ai-extracted";

/// Text the user selected on a page.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub text: String,
    pub html: Option<String>,
}

impl Selection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// Where to save an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveTarget {
    /// An existing collection, by ID
    Existing(String),
    /// A collection created for this save
    New(String),
    /// The shared "AI Extractions" collection, created on first use
    #[default]
    Default,
}

/// The stored item and the collection it went into.
#[derive(Debug, Clone)]
pub struct SavedItem {
    pub collection_id: String,
    pub collection_name: String,
    pub created_collection: bool,
    pub item: Item,
}

/// Save operations over a [`CollectionStore`].
pub struct Collector<S: CollectionStore> {
    store: S,
}

impl<S: CollectionStore> Collector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save a selection into `collection_name`, or into the collection the
    /// detector suggests when no name is given.
    pub async fn save_selection(
        &self,
        selection: Selection,
        source: PageSource,
        collection_name: Option<&str>,
    ) -> StoreResult<SavedItem> {
        let classification = classify(&selection.text);

        let name = collection_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&classification.suggested_label);
        let (collection, created) = self.find_or_create(name).await?;

        let mut item = Item::new(ItemType::from(classification.kind))
            .with_data("content", selection.text)
            .with_source(source);
        if let Some(html) = selection.html {
            item = item.with_data("html", html);
        }

        info!(
            kind = %classification.kind,
            collection = %collection.name,
            "Saving selection"
        );
        self.append(collection, created, item).await
    }

    /// Save extracted records as one `ai_extraction` item.
    pub async fn save_extraction(
        &self,
        records: &[Record],
        query: &str,
        source: PageSource,
        target: SaveTarget,
    ) -> StoreResult<SavedItem> {
        if records.is_empty() {
            return Err(StoreError::EmptyExtraction);
        }

        let (collection, created) = self.resolve_target(target).await?;

        let structured: Vec<Value> = records.iter().cloned().map(Value::from).collect();
        let item = Item::new(ItemType::AiExtraction)
            .with_data("content", format_records_as_text(records))
            .with_data("structured", structured)
            .with_data("query", query)
            .with_source(source)
            .with_tag(AI_EXTRACTED_TAG);

        info!(
            record_count = records.len(),
            collection = %collection.name,
            "Saving extraction"
        );
        self.append(collection, created, item).await
    }

    async fn resolve_target(&self, target: SaveTarget) -> StoreResult<(Collection, bool)> {
        match target {
            SaveTarget::Existing(id) => match self.store.get_by_id(&id).await? {
                Some(collection) => Ok((collection, false)),
                None => {
                    warn!(collection_id = %id, "Target collection not found, using default");
                    self.find_or_create(DEFAULT_EXTRACTION_COLLECTION).await
                }
            },
            SaveTarget::New(name) if !name.trim().is_empty() => {
                let collection = Collection::new(name.trim());
                self.store.put(collection.clone()).await?;
                Ok((collection, true))
            }
            SaveTarget::New(_) | SaveTarget::Default => {
                self.find_or_create(DEFAULT_EXTRACTION_COLLECTION).await
            }
        }
    }

    async fn find_or_create(&self, name: &str) -> StoreResult<(Collection, bool)> {
        if let Some(existing) = self.store.find_by_name(name).await? {
            return Ok((existing, false));
        }

        let collection = Collection::new(name.trim());
        self.store.put(collection.clone()).await?;
        Ok((collection, true))
    }

    async fn append(
        &self,
        collection: Collection,
        created_collection: bool,
        mut item: Item,
    ) -> StoreResult<SavedItem> {
        item.validation = validate_item(&item);
        if !item.validation.is_valid() {
            warn!(issues = ?item.validation.issues, "Saved item has validation issues");
        }

        self.store.append_item(&collection.id, item.clone()).await?;

        Ok(SavedItem {
            collection_id: collection.id,
            collection_name: collection.name,
            created_collection,
            item,
        })
    }
}
