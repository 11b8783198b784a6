use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{db::SessionStore, services::providers::CatalogProvider, store::AppStore};

/// Shared handles passed to every HTTP handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<AppStore>>,
    pub provider: Arc<dyn CatalogProvider>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CatalogProvider>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Arc::new(RwLock::new(AppStore::new())),
            provider,
            sessions,
        }
    }
}
