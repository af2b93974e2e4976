//! Catalog normalizer: raw tabular rows into canonical `JobPosting`s.
//!
//! Rules:
//! - multi-value facets split on the exact `", "` delimiter, no further trimming
//! - an empty facet cell is an empty set
//! - duplicates are dropped, first occurrence wins, order kept
//! - blank descriptions become `None`
//! - deadlines parse with exactly `%m/%d/%Y`; anything else is an `IngestionError`
//!
//! Normalizing is idempotent: re-joining a canonical record's facets and
//! re-normalizing yields the same record.

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::models::{JobPosting, RawJobRow};

pub const FACET_DELIMITER: &str = ", ";
pub const DEADLINE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("row {row}: deadline '{value}' is not in MM/DD/YYYY format")]
    InvalidDeadline { row: usize, value: String },

    #[error("row {row}: deadline is missing")]
    MissingDeadline { row: usize },

    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("could not read catalog: {0}")]
    Read(#[from] csv::Error),
}

/// Splits a delimited facet cell into an ordered, duplicate-free list.
pub fn split_facet(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return vec![];
    }
    let mut values: Vec<String> = Vec::new();
    for part in cell.split(FACET_DELIMITER) {
        if !values.iter().any(|v| v == part) {
            values.push(part.to_string());
        }
    }
    values
}

pub fn join_facet(values: &[String]) -> String {
    values.join(FACET_DELIMITER)
}

/// Parses a `MM/DD/YYYY` deadline. Four-digit years only: `3/1/24` is rejected.
/// Whitespace anywhere is rejected; chrono would otherwise skip it before a number.
pub fn parse_deadline(value: &str) -> Option<NaiveDate> {
    if value.chars().any(char::is_whitespace) {
        return None;
    }
    let year = value.rsplit('/').next()?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, DEADLINE_FORMAT).ok()
}

/// Normalizes one raw row. `row` is the 1-based data row number used in errors.
pub fn normalize_row(raw: &RawJobRow, row: usize) -> Result<JobPosting, IngestionError> {
    let deadline_text = raw
        .deadline
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or(IngestionError::MissingDeadline { row })?;
    let deadline = parse_deadline(deadline_text).ok_or_else(|| IngestionError::InvalidDeadline {
        row,
        value: deadline_text.to_string(),
    })?;

    let description = raw
        .description
        .as_ref()
        .filter(|d| !d.trim().is_empty())
        .cloned();

    Ok(JobPosting {
        agency: raw.agency.clone(),
        opportunity_name: raw.opportunity_name.clone(),
        link: raw.link.clone(),
        description,
        citizenship_eligibility: split_facet(&raw.citizenship_eligibility),
        education_level: split_facet(&raw.education_level),
        category: split_facet(&raw.category),
        deadline,
    })
}
