//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::QueryConfig;
use crate::graph::TransitGraph;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The graph every query runs against
    pub graph: Arc<TransitGraph>,

    /// Query parameters used when a request leaves them out
    pub defaults: Arc<QueryConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: TransitGraph, defaults: QueryConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            defaults: Arc::new(defaults),
        }
    }
}
