pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::errors::AppError;
use crate::matching::handlers as matching;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/facets", get(catalog::handle_facets))
        .route("/api/v1/jobs", post(catalog::handle_submit))
        .route("/api/v1/jobs/browse", post(catalog::handle_browse))
        // Match API
        .route("/api/v1/matches", post(matching::handle_match_upload))
        .route("/api/v1/matches/text", post(matching::handle_match_text))
        .route("/api/v1/score", post(matching::handle_rank))
        .fallback(not_found)
        .with_state(state)
}
