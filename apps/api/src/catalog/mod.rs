// Canonical dataset of internship postings: ingestion, normalization,
// append-only submission, and the browse view.

pub mod browse;
pub mod handlers;
pub mod models;
pub mod mutator;
pub mod normalize;
pub mod store;
