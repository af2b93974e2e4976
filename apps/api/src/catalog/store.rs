use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::catalog::models::{Facet, JobPosting, RawJobRow};
use crate::catalog::normalize::{normalize_row, split_facet, IngestionError};

/// Agency dropdown entry for submitters whose agency is not listed yet.
pub const OTHER_AGENCY: &str = "Other";

/// Session-scoped catalog handle. Handlers read concurrently; only submissions write.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// The canonical dataset: normalized postings in ingestion order.
///
/// Append-only. A posting's index never changes once inserted, so indices
/// double as the ingestion-order tie-breaker for ranking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    postings: Vec<JobPosting>,
}

/// Distinct values offered by the filter and submission UIs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FacetOptions {
    pub citizenship: Vec<String>,
    pub education: Vec<String>,
    pub category: Vec<String>,
    /// Sorted, with `"Other"` appended.
    pub agencies: Vec<String>,
}

impl Catalog {
    /// Loads a CSV export of the external sheet. Fails closed: the first
    /// malformed row aborts the whole load.
    pub fn load_csv(path: &Path) -> Result<Self, IngestionError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)?;
        let catalog = Self::from_csv_reader(reader)?;
        info!(
            rows = catalog.len(),
            path = %path.display(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, IngestionError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(rdr);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, IngestionError> {
        let mut postings = Vec::new();
        for (i, record) in reader.deserialize::<RawJobRow>().enumerate() {
            let row = i + 1;
            let raw = record.map_err(|source| IngestionError::Csv { row, source })?;
            postings.push(normalize_row(&raw, row)?);
        }
        Ok(Self { postings })
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Appends an already-normalized posting and returns its index.
    pub fn append(&mut self, posting: JobPosting) -> usize {
        self.postings.push(posting);
        self.postings.len() - 1
    }

    /// Distinct values of one facet, in first-seen order.
    pub fn facet_values(&self, facet: Facet) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for posting in &self.postings {
            for value in facet.values(posting) {
                if !seen.contains(value) {
                    seen.push(value.clone());
                }
            }
        }
        seen
    }

    /// Agency cells are split on the facet delimiter like the other facets,
    /// so a jointly run program lists each agency separately.
    pub fn facet_options(&self) -> FacetOptions {
        let mut agencies: Vec<String> = Vec::new();
        for posting in &self.postings {
            for agency in split_facet(&posting.agency) {
                if !agencies.contains(&agency) {
                    agencies.push(agency);
                }
            }
        }
        agencies.sort();
        agencies.push(OTHER_AGENCY.to_string());

        FacetOptions {
            citizenship: self.facet_values(Facet::Citizenship),
            education: self.facet_values(Facet::Education),
            category: self.facet_values(Facet::Category),
            agencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Agency,Opportunity Name,Citizenship Eligibility,Education Level,Category,Link,Description,Deadline
NASA,Pathways,US Citizen,\"Undergraduate, Graduate\",Engineering,https://nasa.gov/p,Flight software,12/01/2030
NOAA,Hollings,\"US Citizen, International Student\",Undergraduate,\"Climate, Data Science\",https://noaa.gov/h,,01/15/2031
";

    #[test]
    fn test_from_reader_normalizes_every_row() {
        let catalog = Catalog::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        let hollings = &catalog.postings()[1];
        assert_eq!(
            hollings.citizenship_eligibility,
            vec!["US Citizen", "International Student"]
        );
        assert_eq!(hollings.category, vec!["Climate", "Data Science"]);
        assert!(hollings.description.is_none());
    }

    #[test]
    fn test_load_fails_closed_on_bad_deadline() {
        let bad = format!("{CSV}DOE,SULI,US Citizen,Undergraduate,Physics,https://doe.gov,Lab work,2031-01-01\n");
        let err = Catalog::from_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestionError::InvalidDeadline { row: 3, .. }));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_csv_missing_file_is_error() {
        assert!(Catalog::load_csv(Path::new("/nonexistent/jobs.csv")).is_err());
    }

    #[test]
    fn test_facet_options_first_seen_order_and_agencies_sorted() {
        let catalog = Catalog::from_reader(CSV.as_bytes()).unwrap();
        let options = catalog.facet_options();
        assert_eq!(options.citizenship, vec!["US Citizen", "International Student"]);
        assert_eq!(options.education, vec!["Undergraduate", "Graduate"]);
        assert_eq!(options.category, vec!["Engineering", "Climate", "Data Science"]);
        assert_eq!(options.agencies, vec!["NASA", "NOAA", "Other"]);
    }

    #[test]
    fn test_facet_options_split_joint_agencies() {
        let joint = format!(
            "{CSV}\"NSF, NOAA\",Joint Fellowship,US Citizen,Graduate,Climate,https://nsf.gov/j,Ocean data,02/01/2031\n"
        );
        let catalog = Catalog::from_reader(joint.as_bytes()).unwrap();
        assert_eq!(
            catalog.facet_options().agencies,
            vec!["NASA", "NOAA", "NSF", "Other"]
        );
    }

    #[test]
    fn test_append_returns_index_and_preserves_order() {
        let mut catalog = Catalog::from_reader(CSV.as_bytes()).unwrap();
        let extra = catalog.postings()[0].clone();
        assert_eq!(catalog.append(extra), 2);
        assert_eq!(catalog.len(), 3);
    }
}
