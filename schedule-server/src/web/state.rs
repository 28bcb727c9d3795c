//! Application state for the web layer.

use std::sync::Arc;

use crate::store::EntityStore;

/// Shared application state.
///
/// Holds the storage backend behind the [`EntityStore`] trait; handlers
/// never know which concrete backend they are talking to.
#[derive(Clone)]
pub struct AppState {
    /// Entity store shared by all handlers.
    pub store: Arc<dyn EntityStore>,
}

impl AppState {
    /// Create a new app state around a storage backend.
    pub fn new(store: impl EntityStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
