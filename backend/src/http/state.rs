//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::DatasetRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn DatasetRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn DatasetRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
