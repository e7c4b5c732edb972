//! Storage implementations for the collector library.
//!
//! Available backends:
//! - `MemoryCollectionStore` / `MemoryCredentialStore` - In-memory storage
//! - `JsonFileCollectionStore` / `FileCredentialStore` - JSON documents on disk

pub mod file;
pub mod memory;

pub use file::{FileCredentialStore, JsonFileCollectionStore};
pub use memory::{MemoryCollectionStore, MemoryCredentialStore};
