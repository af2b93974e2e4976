//! Pluggable scorers of résumé text against job descriptions.
//!
//! Backends:
//! - `LexicalScorer` (term-frequency cosine, pure Rust, deterministic)
//! - `SemanticScorer` (embedding cosine via an external provider)
//!
//! `AppState` holds an `Arc<dyn SimilarityScorer>`, chosen at startup via `SCORER_BACKEND`.

use async_trait::async_trait;
use thiserror::Error;

use crate::matching::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding provider failed: {0}")]
    Provider(#[from] EmbeddingError),

    #[error("résumé could not be embedded: {0}")]
    ResumeUnavailable(String),
}

/// Implement this to swap similarity backends without touching the match
/// pipeline or handlers. Scores are percentages in [0, 100] with two decimals.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    /// Backend label reported to callers ("lexical" | "semantic").
    fn backend(&self) -> &'static str;

    async fn score(&self, resume_text: &str, description: &str) -> Result<f64, ScoringError>;

    /// Scores many descriptions against one résumé. Output is in input order,
    /// one entry per description; a failed entry does not fail the batch.
    async fn score_batch(
        &self,
        resume_text: &str,
        descriptions: &[&str],
    ) -> Vec<Result<f64, ScoringError>> {
        let mut scores = Vec::with_capacity(descriptions.len());
        for description in descriptions {
            scores.push(self.score(resume_text, description).await);
        }
        scores
    }
}

/// Batch form: `(description, score)` pairs sorted by score, highest first.
/// Descriptions that could not be scored are left out. Ties keep input order.
pub async fn rank_descriptions<'a>(
    scorer: &dyn SimilarityScorer,
    resume_text: &str,
    descriptions: &[&'a str],
) -> Vec<(&'a str, f64)> {
    let scores = scorer.score_batch(resume_text, descriptions).await;
    let mut ranked: Vec<(&'a str, f64)> = descriptions
        .iter()
        .zip(scores)
        .filter_map(|(d, s)| s.ok().map(|s| (*d, s)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
