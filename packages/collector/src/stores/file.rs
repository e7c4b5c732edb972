//! JSON file storage.
//!
//! Each store owns one JSON document. Writes are read-modify-write under a
//! mutex, then replace the file through a temporary sibling so a crash
//! never leaves a half-written document behind.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreResult;
use crate::security::credentials::SecretString;
use crate::traits::store::{CollectionStore, CredentialStore, API_KEY_STORAGE_KEY};
use crate::types::collection::Collection;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionsDocument {
    #[serde(default)]
    collections: Vec<Collection>,
}

/// Collections persisted as a single JSON document, in insertion order.
pub struct JsonFileCollectionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileCollectionStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<CollectionsDocument> {
        Ok(read_document(&self.path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl CollectionStore for JsonFileCollectionStore {
    async fn get_all(&self) -> StoreResult<Vec<Collection>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.collections)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Collection>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .collections
            .into_iter()
            .find(|c| c.id == id))
    }

    async fn put(&self, mut collection: Collection) -> StoreResult<String> {
        let _guard = self.lock.lock().await;
        collection.ensure_id();
        let id = collection.id.clone();

        let mut document = self.load().await?;
        match document.collections.iter_mut().find(|c| c.id == id) {
            Some(existing) => *existing = collection,
            None => document.collections.push(collection),
        }

        write_document(&self.path, &document).await?;
        debug!(collection_id = %id, path = %self.path.display(), "Saved collection");
        Ok(id)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let before = document.collections.len();
        document.collections.retain(|c| c.id != id);

        if document.collections.len() != before {
            write_document(&self.path, &document).await?;
            debug!(collection_id = %id, "Deleted collection");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsDocument {
    #[serde(rename = "google_ai_api_key", default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// The API key persisted as `{"google_ai_api_key": "..."}`.
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get_credential(&self) -> StoreResult<Option<SecretString>> {
        let _guard = self.lock.lock().await;
        let document: CredentialsDocument = read_document(&self.path).await?.unwrap_or_default();
        Ok(document
            .api_key
            .map(SecretString::new)
            .filter(|key| !key.is_blank()))
    }

    async fn set_credential(&self, credential: SecretString) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let document = CredentialsDocument {
            api_key: Some(credential.expose().to_string()),
        };
        write_document(&self.path, &document).await?;
        debug!(key = API_KEY_STORAGE_KEY, "Stored API key");
        Ok(())
    }
}

/// Read a JSON document, or `None` if the file does not exist yet.
async fn read_document<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::types::collection::{Item, ItemType};

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCollectionStore::new(dir.path().join("collections.json"));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collections_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("collections.json");

        let store = JsonFileCollectionStore::new(&path);
        let first = store.put(Collection::new("Contacts")).await.unwrap();
        let second = store.put(Collection::new("Links")).await.unwrap();
        store
            .append_item(&first, Item::new(ItemType::Contact).with_data("content", "a@b.co"))
            .await
            .unwrap();

        let reopened = JsonFileCollectionStore::new(&path);
        let all = reopened.get_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![first.clone(), second]);
        assert_eq!(all[0].items[0].content(), Some("a@b.co"));
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCollectionStore::new(dir.path().join("c.json"));
        let id = store.put(Collection::new("Notes")).await.unwrap();

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileCollectionStore::new(&path).get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_credential_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileCredentialStore::new(&path);

        assert!(store.get_credential().await.unwrap().is_none());
        store.set_credential("AIza-file-key".into()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[API_KEY_STORAGE_KEY], "AIza-file-key");

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(
            reopened.get_credential().await.unwrap().unwrap().expose(),
            "AIza-file-key"
        );
    }

    #[tokio::test]
    async fn test_blank_credential_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"google_ai_api_key": "   "}"#).unwrap();

        assert!(FileCredentialStore::new(&path)
            .get_credential()
            .await
            .unwrap()
            .is_none());
    }
}
