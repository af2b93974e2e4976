//! Ranking & Top-K Selector. Every sort here is stable, so equal keys keep
//! ingestion order and identical inputs always produce identical output.

use serde::{Deserialize, Serialize};

use crate::catalog::models::JobPosting;

/// A posting paired with its similarity score. Exists only within a match request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPosting {
    /// Position in the canonical dataset.
    pub index: usize,
    pub posting: JobPosting,
    pub score: f64,
}

/// Browse ordering chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Opportunity name, ascending.
    #[default]
    Alphabet,
    /// Deadline, soonest first.
    Deadline,
}

/// Sorts by score, highest first, and keeps at most `k`.
pub fn top_k(mut scored: Vec<ScoredPosting>, k: usize) -> Vec<ScoredPosting> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);
    scored
}

/// Orders dataset indices by `key`. No truncation.
pub fn sort_indices(postings: &[JobPosting], indices: &mut [usize], key: SortKey) {
    match key {
        SortKey::Alphabet => {
            indices.sort_by(|&a, &b| postings[a].opportunity_name.cmp(&postings[b].opportunity_name))
        }
        SortKey::Deadline => indices.sort_by_key(|&i| postings[i].deadline),
    }
}
