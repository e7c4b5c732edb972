//! Storage traits for collections and credentials.
//!
//! Both stores are external collaborators of the core:
//! - `CollectionStore`: whole-collection persistence keyed by ID
//! - `CredentialStore`: the single API key, keyed by a fixed name

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::security::credentials::SecretString;
use crate::types::collection::{Collection, Item};

/// Key under which the API key is persisted.
pub const API_KEY_STORAGE_KEY: &str = "google_ai_api_key";

/// Persistence for collections.
///
/// Writes replace the whole collection; concurrent writers to the same
/// collection are last-write-wins.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Get all collections.
    async fn get_all(&self) -> StoreResult<Vec<Collection>>;

    /// Get a collection by ID.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Collection>>;

    /// Insert or replace a collection, assigning an ID if it has none.
    ///
    /// Returns the collection ID.
    async fn put(&self, collection: Collection) -> StoreResult<String>;

    /// Delete a collection. Deleting a missing ID is not an error.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Append an item to a collection, assigning an item ID if it has none.
    async fn append_item(&self, collection_id: &str, mut item: Item) -> StoreResult<()> {
        let mut collection = self.get_by_id(collection_id).await?.ok_or_else(|| {
            StoreError::CollectionNotFound {
                id: collection_id.to_string(),
            }
        })?;

        item.ensure_id();
        collection.items.push(item);
        self.put(collection).await?;
        Ok(())
    }

    /// Find a collection by exact (trimmed) name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Collection>> {
        let name = name.trim();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|c| c.name == name))
    }

    /// Move an item between collections.
    ///
    /// The destination is written before the item leaves the source, so a
    /// failed write can duplicate the item but never drop it. Moving within
    /// one collection only checks that the item exists.
    async fn move_item(&self, item_id: &str, from_id: &str, to_id: &str) -> StoreResult<()> {
        let mut from = self
            .get_by_id(from_id)
            .await?
            .ok_or_else(|| StoreError::CollectionNotFound {
                id: from_id.to_string(),
            })?;

        let index = from
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| StoreError::ItemNotFound {
                collection_id: from_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        if from_id == to_id {
            return Ok(());
        }

        let mut to = self
            .get_by_id(to_id)
            .await?
            .ok_or_else(|| StoreError::CollectionNotFound {
                id: to_id.to_string(),
            })?;

        let item = from.items.remove(index);
        to.items.push(item);

        self.put(to).await?;
        self.put(from).await?;
        Ok(())
    }
}

/// Persistence for the API key.
///
/// Reads are concurrent-safe; concurrent writes are last-write-wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The stored key, or `None` if no usable key is set.
    async fn get_credential(&self) -> StoreResult<Option<SecretString>>;

    /// Store the key, replacing any previous value.
    async fn set_credential(&self, credential: SecretString) -> StoreResult<()>;
}

#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    async fn get_credential(&self) -> StoreResult<Option<SecretString>> {
        (**self).get_credential().await
    }

    async fn set_credential(&self, credential: SecretString) -> StoreResult<()> {
        (**self).set_credential(credential).await
    }
}
