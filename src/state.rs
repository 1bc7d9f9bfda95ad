use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{PlacesClient, Store};

/// Shared by every handler. `store` is `None` when no database is configured;
/// protected routes then answer 500 after the session check.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Option<Store>,
    pub places: PlacesClient,
}

impl AppState {
    pub fn new(config: AppConfig, store: Option<Store>) -> Self {
        let places = PlacesClient::new(&config.integrations);
        Self {
            config: Arc::new(config),
            store,
            places,
        }
    }
}
