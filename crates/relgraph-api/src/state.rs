//! Shared router state.

use std::sync::Arc;

use relgraph_graph::EntityStore;

/// State handed to every handler. Clone is cheap (inner Arcs).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    api_token: Arc<str>,
    allowed_labels: Arc<[String]>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EntityStore>,
        api_token: impl Into<String>,
        allowed_labels: Vec<String>,
    ) -> Self {
        Self {
            store,
            api_token: Arc::from(api_token.into()),
            allowed_labels: Arc::from(allowed_labels),
        }
    }

    /// Exact match against the configured secret.
    pub fn token_matches(&self, presented: &str) -> bool {
        presented == &*self.api_token
    }

    pub fn allowed_labels(&self) -> &[String] {
        &self.allowed_labels
    }
}
