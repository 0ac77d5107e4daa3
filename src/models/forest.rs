//! Per-category forests, raw tree payloads and search results.

use super::page::{PreOrder, null_as_default};
use super::{Category, PageId, PageNode, RawPage};
use serde::{Deserialize, Serialize};

/// Payload of the tree endpoint: one ordered page list per category.
///
/// Missing or `null` categories decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMemopediaTree {
    /// Pages about people.
    #[serde(default, deserialize_with = "null_as_default")]
    pub people: Vec<RawPage>,
    /// Pages about terms.
    #[serde(default, deserialize_with = "null_as_default")]
    pub terms: Vec<RawPage>,
    /// Pages about plans.
    #[serde(default, deserialize_with = "null_as_default")]
    pub plans: Vec<RawPage>,
}

impl RawMemopediaTree {
    /// Returns the raw pages of a category.
    #[must_use]
    pub fn get(&self, category: Category) -> &[RawPage] {
        match category {
            Category::People => &self.people,
            Category::Terms => &self.terms,
            Category::Plans => &self.plans,
        }
    }

    /// Replaces the raw pages of a category.
    pub fn set(&mut self, category: Category, pages: Vec<RawPage>) {
        match category {
            Category::People => self.people = pages,
            Category::Terms => self.terms = pages,
            Category::Plans => self.plans = pages,
        }
    }
}

/// Assembled Memopedia: an ordered sequence of root pages per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemopediaForest {
    /// Root pages about people.
    pub people: Vec<PageNode>,
    /// Root pages about terms.
    pub terms: Vec<PageNode>,
    /// Root pages about plans.
    pub plans: Vec<PageNode>,
}

impl MemopediaForest {
    /// Returns the roots of a category.
    #[must_use]
    pub fn get(&self, category: Category) -> &[PageNode] {
        match category {
            Category::People => &self.people,
            Category::Terms => &self.terms,
            Category::Plans => &self.plans,
        }
    }

    /// Replaces the roots of a category.
    pub fn set(&mut self, category: Category, roots: Vec<PageNode>) {
        match category {
            Category::People => self.people = roots,
            Category::Terms => self.terms = roots,
            Category::Plans => self.plans = roots,
        }
    }

    /// Iterates categories in declaration order with their roots.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[PageNode])> {
        Category::all()
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }

    /// Iterates every page of a category in pre-order.
    #[must_use]
    pub fn pages(&self, category: Category) -> PreOrder<'_> {
        PreOrder::new(self.get(category))
    }

    /// Finds the first page with the given id, searching categories in
    /// declaration order and each tree in pre-order.
    #[must_use]
    pub fn find(&self, id: &PageId) -> Option<(Category, &PageNode)> {
        Category::all().iter().find_map(|category| {
            self.pages(*category)
                .find(|node| node.id() == id)
                .map(|node| (*category, node))
        })
    }

    /// Counts pages across all categories.
    #[must_use]
    pub fn page_count(&self) -> usize {
        Category::all()
            .iter()
            .map(|category| self.pages(*category).count())
            .sum()
    }

    /// Returns true if no category has any page.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.terms.is_empty() && self.plans.is_empty()
    }
}

/// A search hit: a page borrowed from the forest, tagged with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult<'a> {
    /// The matching page.
    pub page: &'a PageNode,
    /// The category whose forest contains the page.
    pub category: Category,
}
