//! Memopedia API access.
//!
//! [`MemopediaSource`] is the seam between the orchestrator and the network:
//! the HTTP client implements it for production and tests substitute scripted
//! sources.
//!
//! Endpoints:
//!
//! | Endpoint | Response |
//! |----------|----------|
//! | `GET /api/people/{persona}/memopedia/tree` | `{people, terms, plans}` raw page lists |
//! | `GET /api/people/{persona}/memopedia/pages/{page}` | `{content}` markdown |

mod http;

pub use http::HttpMemopediaClient;

use crate::Result;
use crate::models::{MemopediaForest, PageContent, RawMemopediaTree};
use crate::services::normalize_tree;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Source of Memopedia data for a persona.
pub trait MemopediaSource: Send + Sync {
    /// Fetches the raw page tree of a persona.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RequestFailed`] on a non-success HTTP status and
    /// [`crate::Error::OperationFailed`] on transport or decoding failures.
    fn fetch_tree(&self, persona_id: &str) -> impl Future<Output = Result<RawMemopediaTree>> + Send;

    /// Fetches the markdown content of one page.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MemopediaSource::fetch_tree`]; an unknown page id
    /// surfaces as the server's not-found status.
    fn fetch_page(
        &self,
        persona_id: &str,
        page_id: &str,
    ) -> impl Future<Output = Result<PageContent>> + Send;
}

/// Fetches a persona's tree and normalizes every category.
///
/// # Errors
///
/// Propagates fetch errors unchanged.
pub async fn fetch_forest<S: MemopediaSource>(source: &S, persona_id: &str) -> Result<MemopediaForest> {
    let raw = source.fetch_tree(persona_id).await?;
    Ok(normalize_tree(&raw))
}

/// HTTP client configuration for Memopedia requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// Builds an HTTP client with the configured timeouts.
#[must_use]
pub fn build_http_client(config: HttpConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build Memopedia HTTP client: {err}");
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RawPage};

    struct StaticSource(RawMemopediaTree);

    impl MemopediaSource for StaticSource {
        async fn fetch_tree(&self, _persona_id: &str) -> Result<RawMemopediaTree> {
            Ok(self.0.clone())
        }

        async fn fetch_page(&self, _persona_id: &str, page_id: &str) -> Result<PageContent> {
            Ok(PageContent {
                content: format!("# {page_id}"),
            })
        }
    }

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.connect_timeout_ms, 3_000);
    }

    #[test]
    fn test_build_http_client_without_timeouts() {
        let _client = build_http_client(HttpConfig {
            timeout_ms: 0,
            connect_timeout_ms: 0,
        });
    }

    #[tokio::test]
    async fn test_fetch_forest_normalizes_nested_payload() {
        let mut raw = RawMemopediaTree::default();
        raw.set(
            Category::People,
            vec![RawPage::new("a", "Alice").with_child(RawPage::new("b", "Bob"))],
        );
        let source = StaticSource(raw);

        let forest = fetch_forest(&source, "persona").await.unwrap();

        assert_eq!(forest.get(Category::People).len(), 1);
        assert_eq!(forest.get(Category::People)[0].children[0].id(), "b");
    }
}
