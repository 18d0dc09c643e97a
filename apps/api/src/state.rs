use std::sync::Arc;

use crate::planning::orchestrator::Orchestrator;
use crate::retrieval::catalog::OpportunityCatalog;
use crate::retrieval::corpus::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the producer strategies chosen at startup.
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<ProfileStore>,
    pub catalog: Arc<OpportunityCatalog>,
}
