//! Lexical strategy: bag-of-words term-frequency vectors over the shared
//! vocabulary of the two documents, compared by cosine.
//!
//! Tokens are lowercased runs of two or more word characters. When
//! `strip_punctuation` is set, punctuation and line breaks are removed from
//! BOTH texts before tokenizing, so "don't" counts as "dont" on either side.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::matching::scorer::{ScoringError, SimilarityScorer};
use crate::matching::similarity::{cosine_from_parts, to_percentage};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern is valid"));

pub struct LexicalScorer {
    strip_punctuation: bool,
}

impl LexicalScorer {
    pub fn new(strip_punctuation: bool) -> Self {
        Self { strip_punctuation }
    }

    fn clean(&self, text: &str) -> String {
        if !self.strip_punctuation {
            return text.to_string();
        }
        text.chars()
            .filter_map(|c| match c {
                '\n' | '\r' => Some(' '),
                c if c.is_ascii_punctuation() => None,
                c => Some(c),
            })
            .collect()
    }

    pub fn term_frequencies(&self, text: &str) -> BTreeMap<String, u32> {
        let cleaned = self.clean(text).to_lowercase();
        let mut counts = BTreeMap::new();
        for token in TOKEN.find_iter(&cleaned) {
            *counts.entry(token.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Percentage score in [0, 100], two decimals. Empty input scores 0.
    pub fn similarity(&self, resume_text: &str, description: &str) -> f64 {
        let a = self.term_frequencies(resume_text);
        let b = self.term_frequencies(description);

        // terms outside the intersection contribute nothing to the dot product
        let dot: f64 = a
            .iter()
            .filter_map(|(term, x)| b.get(term).map(|y| *x as f64 * *y as f64))
            .sum();
        let norm = |tf: &BTreeMap<String, u32>| {
            tf.values().map(|c| (*c as f64).powi(2)).sum::<f64>().sqrt()
        };

        to_percentage(cosine_from_parts(dot, norm(&a), norm(&b)))
    }
}

#[async_trait]
impl SimilarityScorer for LexicalScorer {
    fn backend(&self) -> &'static str {
        "lexical"
    }

    async fn score(&self, resume_text: &str, description: &str) -> Result<f64, ScoringError> {
        Ok(self.similarity(resume_text, description))
    }
}
