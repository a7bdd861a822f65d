use std::sync::Arc;

use catalog_core::catalog::Catalog;
use catalog_core::store::{EntityStore, MemoryStore, PgStore, StoreResult};

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    catalog: Catalog,
    config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(InnerState {
                catalog: Catalog::new(store),
                config,
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}

/// Open the store named by the configuration and bring its schema up to date.
pub async fn connect_store(config: &AppConfig) -> StoreResult<Arc<dyn EntityStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_min_connections,
    )
    .await?;
    tracing::info!("Connected to PostgreSQL");

    store.migrate().await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(store))
}
