//! HTTP client for the Memopedia API.

use super::{HttpConfig, MemopediaSource, build_http_client};
use crate::models::{PageContent, RawMemopediaTree};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::instrument;
use url::Url;

/// Memopedia API client over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpMemopediaClient {
    /// Server root; API paths are appended to it.
    base_url: Url,
    /// Timeouts the client was built with.
    http: HttpConfig,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpMemopediaClient {
    /// Default server root.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Creates a client for the given server root with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is not an absolute
    /// hierarchical URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| Error::InvalidInput(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "base url '{base_url}' cannot carry a path"
            )));
        }

        let http = HttpConfig::default();
        Ok(Self {
            base_url,
            http,
            client: build_http_client(http),
        })
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http = config;
        self.client = build_http_client(config);
        self
    }

    /// Returns the timeouts in effect.
    #[must_use]
    pub const fn http_config(&self) -> HttpConfig {
        self.http
    }

    /// Returns the server root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a persona's tree endpoint.
    #[must_use]
    pub fn tree_url(&self, persona_id: &str) -> Url {
        self.endpoint(&["api", "people", persona_id, "memopedia", "tree"])
    }

    /// URL of a page's content endpoint.
    #[must_use]
    pub fn page_url(&self, persona_id: &str, page_id: &str) -> Url {
        self.endpoint(&["api", "people", persona_id, "memopedia", "pages", page_id])
    }

    /// Appends percent-encoded path segments to the server root.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues a GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> Result<T> {
        let started = Instant::now();
        let url_text = url.to_string();

        let response = self.client.get(url).send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::warn!(
                endpoint,
                url = %url_text,
                error = %e,
                error_kind,
                "Memopedia request failed"
            );
            metrics::counter!("memopedia_fetch_total", "endpoint" => endpoint, "status" => "transport_error")
                .increment(1);
            Error::OperationFailed {
                operation: format!("fetch_{endpoint}"),
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint,
                url = %url_text,
                status = %status,
                "Memopedia API returned error status"
            );
            metrics::counter!("memopedia_fetch_total", "endpoint" => endpoint, "status" => "http_error")
                .increment(1);
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                url: url_text,
            });
        }

        let body: T = response.json().await.map_err(|e| {
            tracing::warn!(endpoint, url = %url_text, error = %e, "Failed to decode Memopedia response");
            metrics::counter!("memopedia_fetch_total", "endpoint" => endpoint, "status" => "decode_error")
                .increment(1);
            Error::OperationFailed {
                operation: format!("decode_{endpoint}"),
                cause: e.to_string(),
            }
        })?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::counter!("memopedia_fetch_total", "endpoint" => endpoint, "status" => "success")
            .increment(1);
        metrics::histogram!("memopedia_fetch_duration_ms", "endpoint" => endpoint).record(elapsed_ms);

        Ok(body)
    }
}

impl MemopediaSource for HttpMemopediaClient {
    #[instrument(skip_all, fields(persona_id = %persona_id))]
    async fn fetch_tree(&self, persona_id: &str) -> Result<RawMemopediaTree> {
        let tree: RawMemopediaTree = self.get_json("tree", self.tree_url(persona_id)).await?;
        tracing::info!(
            people = tree.people.len(),
            terms = tree.terms.len(),
            plans = tree.plans.len(),
            "Fetched Memopedia tree"
        );
        Ok(tree)
    }

    #[instrument(skip_all, fields(persona_id = %persona_id, page_id = %page_id))]
    async fn fetch_page(&self, persona_id: &str, page_id: &str) -> Result<PageContent> {
        let page: PageContent = self
            .get_json("page", self.page_url(persona_id, page_id))
            .await?;
        tracing::info!(content_len = page.content.len(), "Fetched Memopedia page");
        Ok(page)
    }
}
