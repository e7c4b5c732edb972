//! Web Collector Core
//!
//! Turns page text into structured records with a two-stage LLM pipeline,
//! and captures selections and extraction results into named collections.
//!
//! # Pipeline
//!
//! - **Extract**: one prompt asks the model for a JSON array answering the query
//! - **Verify**: for long pages, a second prompt audits the records against the source
//! - **Normalize**: whatever the model returns is coerced into an ordered list of records
//!
//! A failed verification never loses data: the extract-stage records are
//! returned instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use collector::{Extractor, GeminiAI, FileCredentialStore};
//!
//! let ai = GeminiAI::new(FileCredentialStore::new(".collector/credentials.json"));
//! let extractor = Extractor::new(ai);
//!
//! let records = extractor.extract_and_verify(&page_text, "all speaker names").await?;
//! for record in &records {
//!     println!("{:?}", record.get("Name"));
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams for the model and for persistence (AI, CollectionStore, CredentialStore)
//! - [`types`] - Records, requests, collections, and configuration
//! - [`pipeline`] - Prompts, response normalization, and the extract/verify orchestrator
//! - [`detect`] - Heuristic classification of selected text
//! - [`capture`] - Saving selections and extractions into collections
//! - [`table`] - Table and plain-text views of records
//! - [`mapping`] - Projecting items onto export columns
//! - [`template`] - Filling document templates from items
//! - [`validation`] - Data-quality checks for saved items
//! - [`stores`] - In-memory and JSON-file storage
//! - [`security`] - API key handling
//! - [`testing`] - Mock implementations for testing

pub mod capture;
pub mod detect;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod table;
pub mod template;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validation;

#[cfg(feature = "gemini")]
pub mod ai;

// Re-export core types at crate root
pub use capture::{Collector, SaveTarget, SavedItem, Selection, DEFAULT_EXTRACTION_COLLECTION};
pub use detect::{classify, Classification, DataKind};
pub use error::{ErrorKind, ExtractionError, StoreError};
pub use mapping::{apply_mapping, auto_map, FieldMapping};
pub use pipeline::{normalize_response, ExtractionOutcome, Extractor, Verification};
pub use security::SecretString;
pub use stores::{
    FileCredentialStore, JsonFileCollectionStore, MemoryCollectionStore, MemoryCredentialStore,
};
pub use table::{format_records_as_text, RecordTable};
pub use template::{render_template, MISSING_FIELD};
pub use traits::{
    ai::AI,
    store::{CollectionStore, CredentialStore, API_KEY_STORAGE_KEY},
};
pub use types::{
    collection::{Collection, Item, ItemType, PageSource, Validation, ValidationStatus},
    config::{ExtractionConfig, GenerationOptions},
    record::{ExtractionRequest, Record, VerificationRequest, EXTRACTED_RESULT_KEY},
};
pub use validation::validate_item;

#[cfg(feature = "gemini")]
pub use ai::GeminiAI;
