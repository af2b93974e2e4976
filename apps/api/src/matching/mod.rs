// Résumé matching: similarity scoring (lexical or semantic), ranking, top-K.
// All embedding provider calls go through `embedding`; no direct HTTP here.

pub mod embedding;
pub mod handlers;
pub mod lexical;
pub mod pipeline;
pub mod ranking;
pub mod scorer;
pub mod semantic;
pub mod similarity;
