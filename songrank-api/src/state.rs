//! Shared router state.

use songrank_store::SongStore;
use std::sync::Arc;

/// The store handle every request receives.
///
/// Built once at startup and cloned into each handler; operations get it as
/// an explicit argument.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SongStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }
}
