// Relevance search: keyword extraction, synonym expansion, fuzzy field matching
// and the composite ranker. Everything except `handlers` is pure and synchronous.

pub mod filters;
pub mod handlers;
pub mod keywords;
pub mod match_scorer;
pub mod ranker;
pub mod synonyms;

use thiserror::Error;

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidInput(String),
}
