//! Axum route handlers for the catalog API (browse, facets, submit).

use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use serde::Serialize;
use tracing::debug;

use crate::catalog::browse::{browse, BrowseEntry, BrowseRequest};
use crate::catalog::models::JobPosting;
use crate::catalog::mutator::{submit_posting, PostingSubmission};
use crate::catalog::store::FacetOptions;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub total: usize,
    pub jobs: Vec<BrowseEntry>,
}

/// GET /api/v1/facets
pub async fn handle_facets(State(state): State<AppState>) -> Json<FacetOptions> {
    Json(state.catalog.read().await.facet_options())
}

/// POST /api/v1/jobs/browse
///
/// Multi-select facet filter over open postings. Past deadlines are hidden
/// regardless of the selection.
pub async fn handle_browse(
    State(state): State<AppState>,
    Json(request): Json<BrowseRequest>,
) -> Json<BrowseResponse> {
    let today = Local::now().date_naive();
    let catalog = state.catalog.read().await;
    let jobs = browse(catalog.postings(), &request.selection, request.sort, today);
    debug!(
        unfiltered = request.selection.is_empty(),
        sort = ?request.sort,
        results = jobs.len(),
        "Browse"
    );
    Json(BrowseResponse {
        total: jobs.len(),
        jobs,
    })
}

/// POST /api/v1/jobs
///
/// Appends a posting to the in-memory catalog. Visible to browse and match
/// for the rest of the process lifetime; not written back to the source.
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(submission): Json<PostingSubmission>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let mut catalog = state.catalog.write().await;
    let posting = submit_posting(&mut catalog, submission)?;
    Ok((StatusCode::CREATED, Json(posting)))
}
