use crate::config::AppConfig;
use crate::storage::{DocumentStore, JsonFileStore};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = JsonFileStore::new(&config.data_file);
        store.init().await?;
        info!(
            path = %store.path().display(),
            offset = %config.utc_offset,
            "document store ready"
        );

        Ok(Self::from_parts(Arc::new(store), config))
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory state with a seeded document and a throwaway signing key.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::{config::JwtConfig, db::Document, storage::MemoryStore};

        let config = Arc::new(AppConfig {
            data_file: "unused.json".into(),
            utc_offset: time::UtcOffset::UTC,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        });
        let store = Arc::new(MemoryStore::new(Document::seeded())) as Arc<dyn DocumentStore>;
        Self::from_parts(store, config)
    }
}
