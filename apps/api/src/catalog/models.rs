use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the external tabular source, exactly as stored.
/// Multi-value facets are `", "`-delimited strings; the deadline is `MM/DD/YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJobRow {
    #[serde(rename = "Agency")]
    pub agency: String,
    #[serde(rename = "Opportunity Name")]
    pub opportunity_name: String,
    #[serde(rename = "Citizenship Eligibility", default)]
    pub citizenship_eligibility: String,
    #[serde(rename = "Education Level", default)]
    pub education_level: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Deadline", default)]
    pub deadline: Option<String>,
}

/// A normalized internship listing in the canonical dataset.
///
/// Facet fields are ordered, duplicate-free sequences; `category[0]` is the
/// primary tag when only one slot is available for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub agency: String,
    pub opportunity_name: String,
    pub link: String,
    /// `None` when the source cell is blank. Such postings are never matched.
    pub description: Option<String>,
    pub citizenship_eligibility: Vec<String>,
    pub education_level: Vec<String>,
    pub category: Vec<String>,
    pub deadline: NaiveDate,
}

impl JobPosting {
    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.category.first().map(String::as_str)
    }
}

/// The three independently filterable dimensions of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Citizenship,
    Education,
    Category,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Citizenship, Facet::Education, Facet::Category];

    pub fn values<'a>(&self, posting: &'a JobPosting) -> &'a [String] {
        match self {
            Facet::Citizenship => &posting.citizenship_eligibility,
            Facet::Education => &posting.education_level,
            Facet::Category => &posting.category,
        }
    }
}
