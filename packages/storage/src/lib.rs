// ABOUTME: Local persistence for Blueprint state
// ABOUTME: Key-value store trait, SQLite and in-memory backends, and typed state accessors

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod sqlite;
pub mod state_store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use state_store::StateStore;

/// Slot holding the serialized current document
pub const DOCUMENT_KEY: &str = "current_document";
/// Slot holding the serialized comment list
pub const COMMENTS_KEY: &str = "document_comments";
/// Slot holding the serialized saved templates
pub const TEMPLATES_KEY: &str = "saved_templates";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Corrupt value under '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed persistence slots
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
