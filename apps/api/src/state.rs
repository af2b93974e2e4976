use std::sync::Arc;

use crate::catalog::store::SharedCatalog;
use crate::config::Config;
use crate::matching::scorer::SimilarityScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The canonical dataset. Submissions take the write lock; everything else reads.
    pub catalog: SharedCatalog,
    /// Pluggable similarity scorer. Default: LexicalScorer. Swap via SCORER_BACKEND.
    pub scorer: Arc<dyn SimilarityScorer>,
    pub config: Config,
}
