//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::security::credentials::SecretString;
use crate::traits::store::{CollectionStore, CredentialStore};
use crate::types::collection::Collection;

/// In-memory collection storage.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryCollectionStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryCollectionStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.collections.write().unwrap().clear();
    }

    /// Get the number of stored collections.
    pub fn collection_count(&self) -> usize {
        self.collections.read().unwrap().len()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn get_all(&self) -> StoreResult<Vec<Collection>> {
        let mut all: Vec<Collection> = self
            .collections
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Collection>> {
        Ok(self.collections.read().unwrap().get(id).cloned())
    }

    async fn put(&self, mut collection: Collection) -> StoreResult<String> {
        collection.ensure_id();
        let id = collection.id.clone();
        self.collections
            .write()
            .unwrap()
            .insert(id.clone(), collection);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.collections.write().unwrap().remove(id);
        Ok(())
    }
}

/// In-memory API key storage.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<SecretString>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `key`.
    pub fn with_credential(key: impl Into<SecretString>) -> Self {
        Self {
            credential: RwLock::new(Some(key.into())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_credential(&self) -> StoreResult<Option<SecretString>> {
        Ok(self
            .credential
            .read()
            .unwrap()
            .clone()
            .filter(|key| !key.is_blank()))
    }

    async fn set_credential(&self, credential: SecretString) -> StoreResult<()> {
        *self.credential.write().unwrap() = Some(credential);
        Ok(())
    }
}
