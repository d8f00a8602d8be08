//! Application state for the web layer.

use crate::service::LineService;

/// Shared application state.
///
/// Cloned into every handler; the service inside shares its stores
/// between clones.
#[derive(Clone, Default)]
pub struct AppState {
    /// Line and station operations
    pub service: LineService,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: LineService) -> Self {
        Self { service }
    }
}
