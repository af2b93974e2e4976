use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::models::JobPosting;
use crate::filter::{filter_multi, retain_open, MultiSelect};
use crate::matching::ranking::{sort_indices, SortKey};

/// Postings due in fewer than this many days are flagged `due_soon`.
pub const DUE_SOON_DAYS: i64 = 15;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseRequest {
    #[serde(flatten)]
    pub selection: MultiSelect,
    #[serde(default)]
    pub sort: SortKey,
}

/// A browsable posting plus the deadline hints the UI renders as tags.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseEntry {
    #[serde(flatten)]
    pub posting: JobPosting,
    /// First category, for single-tag layouts.
    pub primary_category: Option<String>,
    pub days_left: i64,
    pub due_soon: bool,
}

impl BrowseEntry {
    fn new(posting: &JobPosting, today: NaiveDate) -> Self {
        let days_left = (posting.deadline - today).num_days();
        Self {
            posting: posting.clone(),
            primary_category: posting.primary_category().map(str::to_string),
            days_left,
            due_soon: days_left < DUE_SOON_DAYS,
        }
    }
}

/// Multi-select facet filter, then drop past deadlines, then order by `sort`.
pub fn browse(
    postings: &[JobPosting],
    selection: &MultiSelect,
    sort: SortKey,
    today: NaiveDate,
) -> Vec<BrowseEntry> {
    let mut indices = retain_open(postings, filter_multi(postings, selection), today);
    sort_indices(postings, &mut indices, sort);
    indices
        .into_iter()
        .map(|i| BrowseEntry::new(&postings[i], today))
        .collect()
}
