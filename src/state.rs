//! Application state: configuration and the lesson store.
//!
//! Nothing per-client lives here. Course builder sessions belong to their
//! WebSocket connection (see `routes::ws`).

use tracing::{info, instrument};

use crate::config::{load_config_from_env, CatalogConfig};
use crate::store::{CatalogSource, LessonStore};

#[derive(Debug)]
pub struct AppState {
    pub store: LessonStore,
    pub config: CatalogConfig,
}

impl AppState {
    /// Build state from env: load config, then open the configured catalog source.
    #[instrument(level = "info", skip_all)]
    pub async fn from_env() -> Self {
        let config = load_config_from_env().unwrap_or_default();
        Self::new(config).await
    }

    pub async fn new(config: CatalogConfig) -> Self {
        let source = CatalogSource::from_config(&config.storage);
        info!(target: "lesson_catalog", source = source.name(), page_size = config.browse.page_size, "Opening lesson store");
        let store = LessonStore::open(source).await;
        Self { store, config }
    }

    /// State over an already opened store; used by tests and embedders.
    pub fn with_store(config: CatalogConfig, store: LessonStore) -> Self {
        Self { store, config }
    }
}
