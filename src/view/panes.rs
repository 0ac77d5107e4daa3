//! Navigation and content pane selection.

use crate::models::{MemopediaForest, SearchResult};
use crate::services::ViewState;

/// Shown while the tree is loading.
pub const TREE_LOADING_MESSAGE: &str = "ナレッジベースを読み込み中...";
/// Shown when no page is selected.
pub const EMPTY_SELECTION_MESSAGE: &str = "ページを選択してください";
/// Shown while a page is loading.
pub const PAGE_LOADING_MESSAGE: &str = "読み込み中...";
/// Markdown shown for a page with an empty body.
pub const NO_CONTENT_MARKDOWN: &str = "*内容がありません*";

/// What the navigation side of the viewer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationPane<'a> {
    /// No forest yet, or a tree fetch is pending.
    Loading,
    /// Flat list of search hits.
    SearchResults(Vec<SearchResult<'a>>),
    /// The category trees.
    Tree(&'a MemopediaForest),
}

impl<'a> NavigationPane<'a> {
    /// Chooses the pane for a state.
    ///
    /// A query with no hits shows the tree rather than an empty list.
    #[must_use]
    pub fn from_state(state: &'a ViewState) -> Self {
        let Some(forest) = state.forest.as_deref() else {
            return Self::Loading;
        };
        if state.is_loading_tree {
            return Self::Loading;
        }

        let results = state.search_results();
        if results.is_empty() {
            Self::Tree(forest)
        } else {
            Self::SearchResults(results)
        }
    }
}

/// What the content side of the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPane<'a> {
    /// No page selected.
    EmptySelection,
    /// Page fetch outstanding.
    Loading,
    /// Selected page has an empty body.
    NoContent,
    /// Markdown body of the selected page.
    Markdown(&'a str),
}

impl<'a> ContentPane<'a> {
    /// Chooses the pane for a state. Selection is checked before loading.
    #[must_use]
    pub fn from_state(state: &'a ViewState) -> Self {
        if state.selected_page_id.as_ref().is_none_or(|id| id.is_empty()) {
            Self::EmptySelection
        } else if state.is_loading_page {
            Self::Loading
        } else if state.page_content.is_empty() {
            Self::NoContent
        } else {
            Self::Markdown(&state.page_content)
        }
    }

    /// Text to display: a status message, or the markdown to render.
    #[must_use]
    pub const fn text(self) -> &'a str {
        match self {
            Self::EmptySelection => EMPTY_SELECTION_MESSAGE,
            Self::Loading => PAGE_LOADING_MESSAGE,
            Self::NoContent => NO_CONTENT_MARKDOWN,
            Self::Markdown(markdown) => markdown,
        }
    }
}
