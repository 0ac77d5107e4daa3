//! Normalization of API page data into assembled forests.
//!
//! The tree endpoint may nest children inside their parents, send flat lists,
//! or mix both. Every category goes through the same path: flatten depth-first
//! with parent references taken from the nesting, then rebuild with
//! [`build_tree`]. Ordering and orphan placement therefore behave identically
//! whatever shape the server chose.

use super::build_tree;
use crate::models::{Category, MemopediaForest, PageId, PageNode, PageRecord, RawMemopediaTree, RawPage};

/// Flattens nested pages into records, parents before descendants.
///
/// Top-level pages get `parent_id`; each embedded child gets the id of the
/// page it was nested in. Any parent reference the payload carried is ignored.
#[must_use]
pub fn flatten_pages(pages: &[RawPage], parent_id: Option<PageId>) -> Vec<PageRecord> {
    let mut records = Vec::with_capacity(pages.len());
    let mut stack: Vec<(&RawPage, Option<PageId>)> = pages
        .iter()
        .rev()
        .map(|page| (page, parent_id.clone()))
        .collect();

    while let Some((page, parent)) = stack.pop() {
        records.push(page.to_record(parent));
        stack.extend(
            page.children
                .iter()
                .rev()
                .map(|child| (child, Some(page.id.clone()))),
        );
    }

    records
}

/// Flattens one category's pages and rebuilds them as a forest.
#[must_use]
pub fn normalize_category(pages: &[RawPage]) -> Vec<PageNode> {
    build_tree(flatten_pages(pages, None))
}

/// Normalizes every category of a tree payload, in declaration order.
#[must_use]
pub fn normalize_tree(raw: &RawMemopediaTree) -> MemopediaForest {
    let mut forest = MemopediaForest::default();
    for category in Category::all() {
        let roots = normalize_category(raw.get(*category));
        tracing::debug!(category = %category, roots = roots.len(), "Normalized category");
        forest.set(*category, roots);
    }
    forest
}
