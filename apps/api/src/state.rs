use std::sync::Arc;

use crate::comparisons::store::ComparisonStore;
use crate::generation::generator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// In-memory only; lost on restart.
    pub comparisons: Arc<ComparisonStore>,
}
