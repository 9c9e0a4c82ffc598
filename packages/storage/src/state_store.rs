// ABOUTME: Typed accessors over the key-value store
// ABOUTME: Serializes documents, comments and templates into their slots as JSON

use blueprint_core::{Comment, Document, Template};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::{LocalStore, StorageError, StorageResult, COMMENTS_KEY, DOCUMENT_KEY, TEMPLATES_KEY};

#[derive(Clone)]
pub struct StateStore {
    store: Arc<dyn LocalStore>,
}

impl StateStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    pub async fn load_document(&self) -> StorageResult<Option<Document>> {
        self.read(DOCUMENT_KEY).await
    }

    pub async fn save_document(&self, document: &Document) -> StorageResult<()> {
        self.write(DOCUMENT_KEY, document).await
    }

    pub async fn clear_document(&self) -> StorageResult<()> {
        debug!("Removing persisted document");
        self.store.remove(DOCUMENT_KEY).await
    }

    pub async fn load_comments(&self) -> StorageResult<Vec<Comment>> {
        Ok(self.read(COMMENTS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_comments(&self, comments: &[Comment]) -> StorageResult<()> {
        self.write(COMMENTS_KEY, &comments).await
    }

    pub async fn load_templates(&self) -> StorageResult<Vec<Template>> {
        Ok(self.read(TEMPLATES_KEY).await?.unwrap_or_default())
    }

    pub async fn save_templates(&self, templates: &[Template]) -> StorageResult<()> {
        self.write(TEMPLATES_KEY, &templates).await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Serialization {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw).await
    }
}
