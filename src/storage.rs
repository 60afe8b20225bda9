use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::Document;

/// Failure to read or write the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Whole-document persistence: every request loads, mutates and saves.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Document, StoreError>;
    async fn save(&self, document: &Document) -> Result<(), StoreError>;
}

/// Pretty-printed JSON document on the local file system.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and a seeded document if nothing exists yet.
    pub async fn init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if tokio::fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "document already present");
            return Ok(());
        }
        self.save(&Document::seeded()).await?;
        info!(path = %self.path.display(), "document initialized with default categories");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Document, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::seeded()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Keeps the document in process memory; used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: tokio::sync::RwLock<Document>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(document: Document) -> Self {
        Self {
            document: tokio::sync::RwLock::new(document),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Document, StoreError> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        *self.document.write().await = document.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("database.json"));

        store.init().await.unwrap();

        let document = store.load().await.unwrap();
        assert_eq!(document.categories.len(), 10);
        assert!(document.accounts.is_empty());
        assert!(document.transactions.is_empty());
    }

    #[tokio::test]
    async fn init_keeps_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("database.json"));
        store.save(&Document::default()).await.unwrap();

        store.init().await.unwrap();

        assert!(store.load().await.unwrap().categories.is_empty());
    }

    #[tokio::test]
    async fn save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("database.json"));
        let mut document = Document::seeded();
        document.categories.truncate(2);

        store.save(&document).await.unwrap();

        assert_eq!(store.load().await.unwrap().categories, document.categories);
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn load_without_file_returns_seeded_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));

        assert_eq!(store.load().await.unwrap().categories.len(), 10);
    }

    #[tokio::test]
    async fn load_surfaces_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::default();
        store.save(&Document::seeded()).await.unwrap();
        assert_eq!(store.load().await.unwrap().categories.len(), 10);
    }
}
