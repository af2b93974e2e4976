//! Match pipeline: single-select filter → drop rows without a description →
//! score every candidate → top-K.

use serde::Serialize;
use tracing::info;

use crate::catalog::models::JobPosting;
use crate::filter::{filter_single, SingleSelect};
use crate::matching::ranking::{top_k, ScoredPosting};
use crate::matching::scorer::SimilarityScorer;

#[derive(Debug, Serialize)]
pub struct MatchOutcome {
    pub matches: Vec<ScoredPosting>,
    /// Postings that passed the filter and have a description.
    pub candidates: usize,
    /// Candidates left out because the scorer could not produce a score.
    pub unscored: usize,
    pub scorer_backend: &'static str,
}

/// Indices of postings eligible for matching under `select`, in ingestion order.
pub fn match_candidates(postings: &[JobPosting], select: &SingleSelect) -> Vec<usize> {
    filter_single(postings, select)
        .into_iter()
        .filter(|&i| postings[i].has_description())
        .collect()
}

pub async fn match_resume(
    postings: &[JobPosting],
    scorer: &dyn SimilarityScorer,
    resume_text: &str,
    select: &SingleSelect,
    k: usize,
) -> MatchOutcome {
    let candidates = match_candidates(postings, select);
    let descriptions: Vec<&str> = candidates
        .iter()
        .map(|&i| postings[i].description.as_deref().unwrap_or_default())
        .collect();

    let scores = scorer.score_batch(resume_text, &descriptions).await;

    let mut unscored = 0;
    let mut scored = Vec::with_capacity(candidates.len());
    for (&index, score) in candidates.iter().zip(scores) {
        match score {
            Ok(score) => scored.push(ScoredPosting {
                index,
                posting: postings[index].clone(),
                score,
            }),
            Err(_) => unscored += 1,
        }
    }

    let matches = top_k(scored, k);

    info!(
        backend = scorer.backend(),
        candidates = candidates.len(),
        unscored,
        returned = matches.len(),
        "Résumé match completed"
    );

    MatchOutcome {
        matches,
        candidates: candidates.len(),
        unscored,
        scorer_backend: scorer.backend(),
    }
}
