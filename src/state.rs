use std::sync::{Arc, RwLock};

use crate::catalog::Catalog;
use crate::config::AppConfig;

/// Shared application state: the engine's configuration and the current
/// catalog snapshot.
///
/// The catalog sits behind an RwLock only so the admin import can swap it
/// atomically; request handlers clone the inner Arc out and compute on a
/// consistent snapshot without holding the lock.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<Arc<Catalog>>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: AppConfig) -> Self {
        AppState {
            catalog: Arc::new(RwLock::new(Arc::new(catalog))),
            config: Arc::new(config),
        }
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .clone()
    }

    /// Swap in a freshly imported catalog.
    pub fn replace_catalog(&self, catalog: Catalog) {
        *self.catalog.write().expect("catalog lock poisoned") = Arc::new(catalog);
    }
}
