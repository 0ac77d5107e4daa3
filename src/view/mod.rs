//! Presentation decisions derived from [`ViewState`](crate::services::ViewState).
//!
//! Nothing here renders; it decides which pane variant applies and binds the
//! selection and query to URL parameters.

mod panes;
mod params;

pub use panes::{
    ContentPane, EMPTY_SELECTION_MESSAGE, NO_CONTENT_MARKDOWN, NavigationPane,
    PAGE_LOADING_MESSAGE, TREE_LOADING_MESSAGE,
};
pub use params::ViewParams;
