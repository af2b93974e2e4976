//! Eligibility filters: pure functions from the catalog to row indices.
//!
//! Two request shapes:
//! - `SingleSelect` (match tab): one citizenship and one education choice, each
//!   either a concrete label or the `ALL` wildcard.
//! - `MultiSelect` (browse tab): a set of labels per facet. An empty set means
//!   the facet imposes no constraint. The result starts from every row and is
//!   narrowed by each non-empty facet in turn.
//!
//! Indices are returned in ingestion order.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::models::{Facet, JobPosting};

/// Request-side wildcard label. Never compared against dataset values.
pub const ALL: &str = "All";

/// One dropdown choice: a concrete label or "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn admits(&self, values: &[String]) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(label) => values.iter().any(|v| v == label),
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == ALL {
            Choice::All
        } else {
            Choice::Only(s.to_string())
        }
    }
}

impl From<Choice> for String {
    fn from(c: Choice) -> Self {
        match c {
            Choice::All => ALL.to_string(),
            Choice::Only(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.as_deref().map(Choice::from).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSelect {
    #[serde(default)]
    pub citizenship: Choice,
    #[serde(default)]
    pub education: Choice,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSelect {
    #[serde(default)]
    pub citizenship: BTreeSet<String>,
    #[serde(default)]
    pub education: BTreeSet<String>,
    #[serde(default)]
    pub category: BTreeSet<String>,
}

impl MultiSelect {
    pub fn selection(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Citizenship => &self.citizenship,
            Facet::Education => &self.education,
            Facet::Category => &self.category,
        }
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.selection(*f).is_empty())
    }
}

pub fn passes_single(posting: &JobPosting, select: &SingleSelect) -> bool {
    select.citizenship.admits(&posting.citizenship_eligibility)
        && select.education.admits(&posting.education_level)
}

pub fn filter_single(postings: &[JobPosting], select: &SingleSelect) -> Vec<usize> {
    postings
        .iter()
        .enumerate()
        .filter(|(_, p)| passes_single(p, select))
        .map(|(i, _)| i)
        .collect()
}

/// Rows whose values for `facet` share at least one label with `selected`.
fn facet_matches(postings: &[JobPosting], facet: Facet, selected: &BTreeSet<String>) -> BTreeSet<usize> {
    postings
        .iter()
        .enumerate()
        .filter(|(_, p)| facet.values(p).iter().any(|v| selected.contains(v)))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_multi(postings: &[JobPosting], select: &MultiSelect) -> Vec<usize> {
    let mut result: BTreeSet<usize> = (0..postings.len()).collect();
    for facet in Facet::ALL {
        let selected = select.selection(facet);
        if selected.is_empty() {
            continue;
        }
        let matched = facet_matches(postings, facet, selected);
        result.retain(|i| matched.contains(i));
    }
    result.into_iter().collect()
}

/// Drops postings whose deadline is before `today`. A deadline of today stays.
pub fn retain_open(postings: &[JobPosting], indices: Vec<usize>, today: NaiveDate) -> Vec<usize> {
    indices
        .into_iter()
        .filter(|&i| postings[i].deadline >= today)
        .collect()
}
