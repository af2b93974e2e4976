use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::models::{JobPosting, RawJobRow};
use crate::catalog::normalize::{join_facet, normalize_row, IngestionError};
use crate::catalog::store::Catalog;

/// A facet value from the form: either already `", "`-joined, or the raw
/// multi-select list, which is joined before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FacetInput {
    Joined(String),
    List(Vec<String>),
}

impl Default for FacetInput {
    fn default() -> Self {
        FacetInput::Joined(String::new())
    }
}

impl FacetInput {
    fn into_joined(self) -> String {
        match self {
            FacetInput::Joined(s) => s,
            FacetInput::List(values) => join_facet(&values),
        }
    }
}

impl From<&str> for FacetInput {
    fn from(s: &str) -> Self {
        FacetInput::Joined(s.to_string())
    }
}

/// A new posting as entered in the submission form. The deadline is `MM/DD/YYYY`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostingSubmission {
    #[serde(default)]
    pub opportunity_name: String,
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub citizenship_eligibility: FacetInput,
    #[serde(default)]
    pub education_level: FacetInput,
    #[serde(default)]
    pub category: FacetInput,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    Invalid(#[from] IngestionError),
}

impl PostingSubmission {
    fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("opportunity_name", &self.opportunity_name),
            ("agency", &self.agency),
            ("link", &self.link),
        ];
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if self.deadline.as_deref().map_or(true, |d| d.trim().is_empty()) {
            missing.push("deadline");
        }
        missing
    }

    fn into_raw(self) -> RawJobRow {
        RawJobRow {
            agency: self.agency,
            opportunity_name: self.opportunity_name,
            citizenship_eligibility: self.citizenship_eligibility.into_joined(),
            education_level: self.education_level.into_joined(),
            category: self.category.into_joined(),
            link: self.link,
            description: self.description,
            deadline: self.deadline,
        }
    }
}

/// Validates and normalizes a submission, then appends it.
/// All-or-nothing: on any error the catalog is untouched.
pub fn submit_posting(
    catalog: &mut Catalog,
    submission: PostingSubmission,
) -> Result<JobPosting, SubmissionError> {
    let missing = submission.missing_fields();
    if !missing.is_empty() {
        return Err(SubmissionError::MissingFields(missing));
    }

    let row = catalog.len() + 1;
    let posting = normalize_row(&submission.into_raw(), row)?;
    let index = catalog.append(posting.clone());

    info!(
        index,
        agency = %posting.agency,
        opportunity = %posting.opportunity_name,
        "Posting appended to catalog"
    );
    Ok(posting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::browse::browse;
    use crate::filter::MultiSelect;
    use crate::matching::ranking::SortKey;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn submission() -> PostingSubmission {
        PostingSubmission {
            opportunity_name: "SULI".to_string(),
            agency: "DOE".to_string(),
            citizenship_eligibility: "US Citizen, Permanent Resident".into(),
            education_level: "Undergraduate".into(),
            category: "Physics".into(),
            link: "https://science.osti.gov/wdts/suli".to_string(),
            description: Some("Research at a national lab.".to_string()),
            deadline: Some("01/09/2031".to_string()),
        }
    }

    #[test]
    fn test_submit_appends_normalized_posting() {
        let mut catalog = Catalog::default();
        let posting = submit_posting(&mut catalog, submission()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            posting.citizenship_eligibility,
            vec!["US Citizen", "Permanent Resident"]
        );
        assert_eq!(posting.deadline, NaiveDate::from_ymd_opt(2031, 1, 9).unwrap());
        assert_eq!(catalog.postings()[0], posting);
    }

    #[test]
    fn test_missing_required_fields_leave_catalog_unchanged() {
        let mut catalog = Catalog::default();
        let err = submit_posting(
            &mut catalog,
            PostingSubmission {
                opportunity_name: "  ".to_string(),
                link: String::new(),
                ..submission()
            },
        )
        .unwrap_err();

        match err {
            SubmissionError::MissingFields(fields) => {
                assert_eq!(fields, vec!["opportunity_name", "link"])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_missing_deadline_is_rejected() {
        let mut catalog = Catalog::default();
        let err = submit_posting(
            &mut catalog,
            PostingSubmission {
                deadline: None,
                ..submission()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("deadline"));
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_malformed_deadline_is_rejected() {
        let mut catalog = Catalog::default();
        let err = submit_posting(
            &mut catalog,
            PostingSubmission {
                deadline: Some("2031-01-09".to_string()),
                ..submission()
            },
        )
        .unwrap_err();
        assert!(matches!(err, SubmissionError::Invalid(_)));
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_description_is_optional() {
        let mut catalog = Catalog::default();
        let posting = submit_posting(
            &mut catalog,
            PostingSubmission {
                description: None,
                ..submission()
            },
        )
        .unwrap();
        assert!(!posting.has_description());
    }

    #[test]
    fn test_list_facets_are_joined_then_split() {
        let submission: PostingSubmission = serde_json::from_value(serde_json::json!({
            "opportunity_name": "SULI",
            "agency": "DOE",
            "citizenship_eligibility": ["US Citizen", "Permanent Resident"],
            "education_level": "Undergraduate",
            "category": ["Physics"],
            "link": "https://science.osti.gov/wdts/suli",
            "deadline": "01/09/2031"
        }))
        .unwrap();
        let mut catalog = Catalog::default();
        let posting = submit_posting(&mut catalog, submission).unwrap();
        assert_eq!(
            posting.citizenship_eligibility,
            vec!["US Citizen", "Permanent Resident"]
        );
        assert_eq!(posting.education_level, vec!["Undergraduate"]);
        assert_eq!(posting.category, vec!["Physics"]);
    }

    #[test]
    fn test_empty_facet_list_is_empty_set() {
        let mut catalog = Catalog::default();
        let posting = submit_posting(
            &mut catalog,
            PostingSubmission {
                citizenship_eligibility: FacetInput::List(vec![]),
                ..submission()
            },
        )
        .unwrap();
        assert!(posting.citizenship_eligibility.is_empty());
    }

    #[test]
    fn test_submitted_posting_is_immediately_browsable() {
        let mut catalog = Catalog::default();
        submit_posting(&mut catalog, submission()).unwrap();

        let selection = MultiSelect {
            citizenship: BTreeSet::from(["Permanent Resident".to_string()]),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let entries = browse(catalog.postings(), &selection, SortKey::Alphabet, today);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].posting.opportunity_name, "SULI");
        assert_eq!(entries[0].posting.category, vec!["Physics"]);
    }
}
