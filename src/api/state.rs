use std::sync::Arc;

use crate::{
    db::PreferenceStore,
    services::{CatalogClient, EngineSettings, RecommendationEngine},
};

/// Shared application state
///
/// Cheap to clone; every handler gets the same store, catalog and engine.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PreferenceStore>,
    pub catalog: Arc<dyn CatalogClient>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        catalog: Arc<dyn CatalogClient>,
        settings: EngineSettings,
    ) -> Self {
        let engine = RecommendationEngine::new(store.clone(), catalog.clone(), settings);

        Self {
            store,
            catalog,
            engine: Arc::new(engine),
        }
    }
}
