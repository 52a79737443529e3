//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::CycleService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry, allocator and clock behind the two core operations
    pub service: Arc<CycleService>,
}

impl AppState {
    /// Create a new application state with the given service.
    pub fn new(service: Arc<CycleService>) -> Self {
        Self { service }
    }
}
