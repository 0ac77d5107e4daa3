//! Tree assembly, normalization, search and view orchestration.
//!
//! | Service | Input | Output |
//! |---------|-------|--------|
//! | [`build_tree`] | flat [`PageRecord`](crate::models::PageRecord)s | ordered forest |
//! | [`normalize_tree`] | raw API payload | [`MemopediaForest`](crate::models::MemopediaForest) |
//! | [`search_forest`] | forest + query | borrowed [`SearchResult`](crate::models::SearchResult)s |
//! | [`QueryOrchestrator`] | a [`MemopediaSource`](crate::client::MemopediaSource) | [`ViewState`] |
//!
//! Everything except the orchestrator is pure and synchronous.

mod normalizer;
mod orchestrator;
mod search;
mod tree_builder;

pub use normalizer::{flatten_pages, normalize_category, normalize_tree};
pub use orchestrator::{OrchestratorOptions, QueryOrchestrator, ViewState};
pub use search::{flatten_forest, normalize_query, page_matches, search_forest};
pub use tree_builder::build_tree;
