//! # Memopedia
//!
//! Client-side core for browsing a persona's Memopedia: a knowledge base of
//! categorized pages (people, terms, plans) arranged in parent/child trees.
//!
//! The crate takes the page data served by the Memopedia API, which may arrive
//! flat (parent references) or already nested (embedded children), and turns it
//! into an ordered, navigable forest plus a substring search over page fields.
//!
//! ## Components
//!
//! - [`services::build_tree`] assembles a forest from flat records
//! - [`services::normalize_category`] flattens nested API data and rebuilds it
//! - [`services::search_forest`] filters a forest by a free-text query
//! - [`services::QueryOrchestrator`] sequences tree and page fetches and holds view state
//!
//! ## Example
//!
//! ```rust
//! use memopedia::models::{Category, PageRecord, MemopediaForest};
//! use memopedia::services::{build_tree, search_forest};
//!
//! let pages = vec![
//!     PageRecord::new("1", "Alice").with_summary("engineer"),
//!     PageRecord::new("2", "Robotics lab").with_parent("1"),
//! ];
//! let mut forest = MemopediaForest::default();
//! forest.set(Category::People, build_tree(pages));
//!
//! let results = search_forest(&forest, "ENGIN");
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].category, Category::People);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod view;

pub use client::{HttpConfig, HttpMemopediaClient, MemopediaSource};
pub use config::MemopediaConfig;
pub use models::{
    Category, MemopediaForest, PageContent, PageId, PageNode, PageRecord, RawMemopediaTree,
    RawPage, SearchResult,
};
pub use services::{OrchestratorOptions, QueryOrchestrator, ViewState};
pub use view::{ContentPane, NavigationPane, ViewParams};

/// Error type for memopedia operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `RequestFailed` | The Memopedia API answered with a non-success HTTP status |
/// | `OperationFailed` | Transport errors, undecodable bodies, config or logging setup failures |
/// | `InvalidInput` | Unknown category names, missing persona, malformed base URL |
///
/// Tree building, normalization and search never fail; malformed page data
/// degrades to root placement instead of raising.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The API returned a non-success HTTP status.
    #[error("request to {url} failed with HTTP status {status}")]
    RequestFailed {
        /// The HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - The HTTP connection fails or times out
    /// - A response body is not the expected JSON shape
    /// - A configuration file cannot be read or parsed
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::OperationFailed { .. } | Self::InvalidInput(_) => None,
        }
    }
}

/// Result type alias for memopedia operations.
pub type Result<T> = std::result::Result<T, Error>;
