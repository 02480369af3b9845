//! Application state.

use std::sync::Arc;

use retitle_bus::EventBus;
use retitle_store::JobStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn JobStore>,
    pub bus: EventBus,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig, store: Arc<dyn JobStore>, bus: EventBus) -> Self {
        Self { config, store, bus }
    }
}
