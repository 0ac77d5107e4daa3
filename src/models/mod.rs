//! Data models for memopedia.
//!
//! Pages exist in three shapes: [`RawPage`] as served by the API (possibly
//! nested), [`PageRecord`] in flat form with a parent reference, and
//! [`PageNode`] in tree form owning its children.

mod category;
mod forest;
mod page;

pub use category::Category;
pub use forest::{MemopediaForest, RawMemopediaTree, SearchResult};
pub use page::{PageContent, PageId, PageNode, PageRecord, PreOrder, RawPage};
