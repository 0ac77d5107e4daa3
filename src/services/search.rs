//! Free-text search over an assembled forest.
//!
//! Matching is case-insensitive substring containment against
//! `title + " " + summary + " " + keywords.join(" ")`. There is no ranking:
//! results come back in category declaration order, then tree pre-order.

use crate::models::{MemopediaForest, PageNode, PageRecord, PreOrder, SearchResult};

/// Returns the lower-cased, trimmed query, or `None` when no search is active.
#[must_use]
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Returns true if the page's searchable text contains `needle`.
///
/// `needle` must already be normalized with [`normalize_query`].
#[must_use]
pub fn page_matches(page: &PageRecord, needle: &str) -> bool {
    page.search_text().to_lowercase().contains(needle)
}

/// Flattens one category's roots into pre-order.
#[must_use]
pub fn flatten_forest(roots: &[PageNode]) -> Vec<&PageNode> {
    PreOrder::new(roots).collect()
}

/// Searches every category of the forest.
///
/// An empty or whitespace-only query yields no results.
#[must_use]
pub fn search_forest<'a>(forest: &'a MemopediaForest, query: &str) -> Vec<SearchResult<'a>> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };

    let results: Vec<SearchResult<'a>> = forest
        .iter()
        .flat_map(|(category, roots)| {
            let needle = needle.as_str();
            PreOrder::new(roots)
                .filter(move |node| page_matches(&node.page, needle))
                .map(move |page| SearchResult { page, category })
        })
        .collect();

    tracing::debug!(query = %needle, hits = results.len(), "Searched forest");
    results
}
