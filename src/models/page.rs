//! Page records, tree nodes and page identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a page, unique within its category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Creates a new page ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for PageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A page in flat form: its fields plus an optional reference to its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Unique identifier within the category.
    pub id: PageId,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
    /// Ordered keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Vividness label assigned by the memory subsystem.
    #[serde(default)]
    pub vividness: String,
    /// Whether the page is a trunk (category backbone) page.
    #[serde(default)]
    pub is_trunk: bool,
    /// Whether the page is flagged important.
    #[serde(default)]
    pub is_important: bool,
    /// Identifier of the parent page, if any.
    #[serde(default)]
    pub parent_id: Option<PageId>,
}

impl PageRecord {
    /// Creates a root record with the given id and title.
    #[must_use]
    pub fn new(id: impl Into<PageId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the keywords.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the vividness label.
    #[must_use]
    pub fn with_vividness(mut self, vividness: impl Into<String>) -> Self {
        self.vividness = vividness.into();
        self
    }

    /// Sets the parent reference.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<PageId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the trunk and important flags.
    #[must_use]
    pub fn with_flags(mut self, is_trunk: bool, is_important: bool) -> Self {
        self.is_trunk = is_trunk;
        self.is_important = is_important;
        self
    }

    /// Returns the parent reference when it names a page.
    ///
    /// An empty parent id is treated the same as no parent.
    #[must_use]
    pub fn parent(&self) -> Option<&PageId> {
        self.parent_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Returns the text searched by free-text queries:
    /// title, summary and space-joined keywords, separated by single spaces.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.summary,
            self.keywords.join(" ")
        )
    }
}

/// A page in tree form, owning its children in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageNode {
    /// The page fields.
    #[serde(flatten)]
    pub page: PageRecord,
    /// Child pages, in the order they were attached.
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Wraps a record as a leaf node.
    #[must_use]
    pub const fn leaf(page: PageRecord) -> Self {
        Self {
            page,
            children: Vec::new(),
        }
    }

    /// Returns the page id.
    #[must_use]
    pub const fn id(&self) -> &PageId {
        &self.page.id
    }

    /// Returns the page title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.page.title
    }

    /// Returns true if the node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Iterates this node and its descendants in pre-order.
    pub fn descendants(&self) -> PreOrder<'_> {
        PreOrder::new(std::slice::from_ref(self))
    }
}

/// Pre-order traversal over a sequence of sibling trees.
///
/// Visits each node before its descendants, children in stored order, using
/// an explicit stack so depth is bounded only by memory.
pub struct PreOrder<'a> {
    stack: Vec<&'a PageNode>,
}

impl<'a> PreOrder<'a> {
    /// Starts a traversal over the given roots.
    #[must_use]
    pub fn new(roots: &'a [PageNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a PageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A page as served by the tree endpoint, possibly carrying nested children.
///
/// Fields other than `id` tolerate absence and `null`. A `parent_id` sent by
/// the server is ignored: nesting is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Unique identifier within the category.
    pub id: PageId,
    /// Page title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// One-line summary.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// Ordered keywords.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// Vividness label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vividness: String,
    /// Trunk flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_trunk: bool,
    /// Important flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_important: bool,
    /// Embedded children; empty means leaf.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<RawPage>,
}

impl RawPage {
    /// Creates a leaf raw page with the given id and title.
    #[must_use]
    pub fn new(id: impl Into<PageId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Appends an embedded child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Converts to a flat record under the given parent, dropping children.
    #[must_use]
    pub fn to_record(&self, parent_id: Option<PageId>) -> PageRecord {
        PageRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            keywords: self.keywords.clone(),
            vividness: self.vividness.clone(),
            is_trunk: self.is_trunk,
            is_important: self.is_important,
            parent_id,
        }
    }
}

/// Body of the page content endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Markdown text of the page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// Deserializes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
