//! Axum route handlers for the Match API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::extract_or_empty;
use crate::filter::{Choice, SingleSelect};
use crate::matching::pipeline::{match_resume, MatchOutcome};
use crate::matching::scorer::rank_descriptions;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchTextRequest {
    pub resume_text: String,
    #[serde(flatten)]
    pub select: SingleSelect,
}

#[derive(Debug, Serialize)]
pub struct MatchEntry {
    pub rank: usize,
    pub agency: String,
    pub opportunity_name: String,
    pub link: String,
    pub description: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// False when the upload yielded no text; scores are then all 0.
    pub resume_text_available: bool,
    pub scorer_backend: &'static str,
    pub candidates: usize,
    pub unscored: usize,
    pub matches: Vec<MatchEntry>,
}

impl MatchResponse {
    fn from_outcome(outcome: MatchOutcome, resume_text_available: bool) -> Self {
        let matches = outcome
            .matches
            .into_iter()
            .enumerate()
            .map(|(i, m)| MatchEntry {
                rank: i + 1,
                agency: m.posting.agency,
                opportunity_name: m.posting.opportunity_name,
                link: m.posting.link,
                description: m.posting.description.unwrap_or_default(),
                score: m.score,
            })
            .collect();
        Self {
            resume_text_available,
            scorer_backend: outcome.scorer_backend,
            candidates: outcome.candidates,
            unscored: outcome.unscored,
            matches,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub resume_text: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedDescription {
    pub description: String,
    pub score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn run_match(
    state: &AppState,
    resume_text: &str,
    select: &SingleSelect,
    resume_text_available: bool,
) -> MatchResponse {
    // snapshot so a slow scorer never holds the catalog lock
    let postings = state.catalog.read().await.postings().to_vec();
    let outcome = match_resume(
        &postings,
        state.scorer.as_ref(),
        resume_text,
        select,
        state.config.match_top_k,
    )
    .await;
    MatchResponse::from_outcome(outcome, resume_text_available)
}

/// POST /api/v1/matches/text
///
/// Matches already-extracted résumé text against the catalog.
pub async fn handle_match_text(
    State(state): State<AppState>,
    Json(request): Json<MatchTextRequest>,
) -> Json<MatchResponse> {
    let available = !request.resume_text.trim().is_empty();
    Json(run_match(&state, &request.resume_text, &request.select, available).await)
}

/// POST /api/v1/matches
///
/// Multipart upload: a `resume` PDF part plus optional `citizenship` and
/// `education` text parts (absent or "All" means no restriction). An
/// unreadable PDF still returns a (zero-score) match list.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut select = SingleSelect::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                resume = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read resume upload: {e}"))
                })?)
            }
            "citizenship" | "education" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read field '{name}': {e}"))
                })?;
                let choice = Choice::from(value.as_str());
                if name == "citizenship" {
                    select.citizenship = choice;
                } else {
                    select.education = choice;
                }
            }
            _ => {}
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("Missing 'resume' file part".to_string()))?;
    let (text, available) = extract_or_empty(resume).await;

    Ok(Json(run_match(&state, &text, &select, available).await))
}

/// POST /api/v1/score
///
/// Scores résumé text against free-form descriptions, highest first.
/// Descriptions the scorer could not handle are omitted.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Vec<RankedDescription>>, AppError> {
    if request.descriptions.is_empty() {
        return Err(AppError::Validation(
            "descriptions cannot be empty".to_string(),
        ));
    }
    let descriptions: Vec<&str> = request.descriptions.iter().map(String::as_str).collect();
    let ranked = rank_descriptions(state.scorer.as_ref(), &request.resume_text, &descriptions)
        .await
        .into_iter()
        .map(|(description, score)| RankedDescription {
            description: description.to_string(),
            score,
        })
        .collect();
    Ok(Json(ranked))
}
