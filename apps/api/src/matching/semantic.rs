//! Semantic strategy: cosine of provider embeddings.
//!
//! Within one batch the résumé is embedded once and the descriptions are
//! embedded sequentially, so output order is job-index order. Description
//! vectors are cached by exact text only when `cache` is enabled; providers
//! that are not deterministic can make scores vary between runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::matching::embedding::Embedder;
use crate::matching::scorer::{ScoringError, SimilarityScorer};
use crate::matching::similarity::{cosine_similarity, to_percentage};

pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
    cache: Option<Mutex<HashMap<String, Vec<f32>>>>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>, cache: bool) -> Self {
        Self {
            embedder,
            cache: cache.then(|| Mutex::new(HashMap::new())),
        }
    }

    /// Empty text has no meaning to embed; it maps to the zero vector (score 0)
    /// without a provider call.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.embedder.dimensions()]);
        }
        Ok(self.embedder.embed(text).await?)
    }

    async fn embed_description(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        let Some(cache) = &self.cache else {
            return self.embed(text).await;
        };
        if let Some(hit) = cache.lock().await.get(text) {
            return Ok(hit.clone());
        }
        let vector = self.embed(text).await?;
        cache.lock().await.insert(text.to_string(), vector.clone());
        Ok(vector)
    }
}

#[async_trait]
impl SimilarityScorer for SemanticScorer {
    fn backend(&self) -> &'static str {
        "semantic"
    }

    async fn score(&self, resume_text: &str, description: &str) -> Result<f64, ScoringError> {
        let resume = self.embed(resume_text).await?;
        let job = self.embed_description(description).await?;
        Ok(to_percentage(cosine_similarity(&resume, &job)))
    }

    async fn score_batch(
        &self,
        resume_text: &str,
        descriptions: &[&str],
    ) -> Vec<Result<f64, ScoringError>> {
        let resume = match self.embed(resume_text).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Résumé embedding failed, no posting can be scored: {e}");
                let reason = e.to_string();
                return descriptions
                    .iter()
                    .map(|_| Err(ScoringError::ResumeUnavailable(reason.clone())))
                    .collect();
            }
        };

        let mut scores = Vec::with_capacity(descriptions.len());
        for (index, description) in descriptions.iter().enumerate() {
            let score = self
                .embed_description(description)
                .await
                .map(|job| to_percentage(cosine_similarity(&resume, &job)));
            if let Err(e) = &score {
                warn!(index, "Description embedding failed: {e}");
            }
            scores.push(score);
        }
        scores
    }
}
