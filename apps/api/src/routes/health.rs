use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, active scorer and catalog size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let postings = state.catalog.read().await.len();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "internships-api",
        "scorer": state.scorer.backend(),
        "postings": postings
    }))
}
