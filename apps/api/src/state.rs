use std::sync::Arc;

use crate::auth::{HeaderProfileResolver, ProfileResolver};
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Pluggable caller authentication. Default: `HeaderProfileResolver`.
    pub resolver: Arc<dyn ProfileResolver>,
}

impl AppState {
    /// State with the default header-based resolver over the same store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        let resolver = Arc::new(HeaderProfileResolver::new(store.clone()));
        Self { store, resolver }
    }

    #[cfg(test)]
    pub fn with_resolver(mut self, resolver: Arc<dyn ProfileResolver>) -> Self {
        self.resolver = resolver;
        self
    }
}
