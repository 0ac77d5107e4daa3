//! View-state orchestration over a [`MemopediaSource`].
//!
//! The orchestrator owns the current forest, the selected page, the search
//! query and the loaded page body, and sequences the two fetches that feed
//! them. Every mutator takes `&self`, so several loads can be in flight on one
//! task at once; each resolution writes its own result when it arrives.
//!
//! Without [`OrchestratorOptions::discard_stale`], resolutions are applied in
//! arrival order: if an earlier page request finishes after a later one, its
//! content is what remains visible. With it enabled, every fetch carries a
//! request token and only the newest request of each kind may write state or
//! clear its loading flag.
//!
//! Loading flags are always released when a fetch settles, success or not.
//! A failed fetch leaves the previous forest or page content untouched.

use crate::client::{MemopediaSource, fetch_forest};
use crate::models::{Category, MemopediaForest, PageId, PageNode, SearchResult};
use crate::services::search_forest;
use crate::view::{ContentPane, NavigationPane, ViewParams};
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::instrument;

/// Snapshot of everything a viewer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Persona whose Memopedia is shown.
    pub persona_id: String,
    /// Latest successfully loaded forest.
    pub forest: Option<Arc<MemopediaForest>>,
    /// Selected page, which may name a page no longer in the forest.
    pub selected_page_id: Option<PageId>,
    /// Raw search text as typed.
    pub query: String,
    /// Markdown body of the selected page.
    pub page_content: String,
    /// True until the pending tree fetch settles.
    pub is_loading_tree: bool,
    /// True while a page fetch is outstanding.
    pub is_loading_page: bool,
}

impl ViewState {
    /// Creates the initial state for a persona: nothing loaded, tree pending.
    #[must_use]
    pub fn new(persona_id: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            forest: None,
            selected_page_id: None,
            query: String::new(),
            page_content: String::new(),
            is_loading_tree: true,
            is_loading_page: false,
        }
    }

    /// Search hits for the current query, borrowed from the forest.
    #[must_use]
    pub fn search_results(&self) -> Vec<SearchResult<'_>> {
        self.forest
            .as_deref()
            .map(|forest| search_forest(forest, &self.query))
            .unwrap_or_default()
    }

    /// Locates the selected page in the forest.
    #[must_use]
    pub fn selected_page(&self) -> Option<(Category, &PageNode)> {
        let id = self.selected_page_id.as_ref()?;
        self.forest.as_deref()?.find(id)
    }

    /// What the navigation pane should show.
    #[must_use]
    pub fn navigation(&self) -> NavigationPane<'_> {
        NavigationPane::from_state(self)
    }

    /// What the content pane should show.
    #[must_use]
    pub fn content(&self) -> ContentPane<'_> {
        ContentPane::from_state(self)
    }

    /// The `page`/`q` parameters describing this state.
    #[must_use]
    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            page: self
                .selected_page_id
                .as_ref()
                .map(ToString::to_string)
                .filter(|id| !id.is_empty()),
            q: Some(self.query.clone()).filter(|q| !q.is_empty()),
        }
    }
}

/// Orchestrator behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Ignore resolutions of fetches superseded by a newer one.
    pub discard_stale: bool,
}

/// Which fetch a loading flag belongs to.
#[derive(Debug, Clone, Copy)]
enum FetchKind {
    Tree,
    Page,
}

/// Holds state and sequences fetches for one viewer.
pub struct QueryOrchestrator<S> {
    source: S,
    options: OrchestratorOptions,
    state: Mutex<ViewState>,
    tree_requests: AtomicU64,
    page_requests: AtomicU64,
}

impl<S: MemopediaSource> QueryOrchestrator<S> {
    /// Creates an orchestrator with nothing loaded yet.
    ///
    /// Call [`Self::load_tree`] to perform the initial fetch.
    #[must_use]
    pub fn new(source: S, persona_id: impl Into<String>) -> Self {
        Self::with_options(source, persona_id, OrchestratorOptions::default())
    }

    /// Creates an orchestrator with explicit options.
    #[must_use]
    pub fn with_options(
        source: S,
        persona_id: impl Into<String>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            source,
            options,
            state: Mutex::new(ViewState::new(persona_id)),
            tree_requests: AtomicU64::new(0),
            page_requests: AtomicU64::new(0),
        }
    }

    /// Returns the data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns a copy of the current state; the forest is shared, not cloned.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    /// Fetches and normalizes the persona's tree, replacing the forest.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors; the previous forest is kept.
    #[instrument(skip(self))]
    pub async fn load_tree(&self) -> Result<()> {
        let token = self.tree_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let persona_id = {
            let mut state = self.lock();
            state.is_loading_tree = true;
            state.persona_id.clone()
        };
        let _loading = LoadingGuard::new(self, FetchKind::Tree, token);

        let started = Instant::now();
        let forest = fetch_forest(&self.source, &persona_id).await?;
        let pages = forest.page_count();

        if self.is_current(FetchKind::Tree, token) {
            self.lock().forest = Some(Arc::new(forest));
            tracing::info!(
                persona_id = %persona_id,
                pages,
                elapsed_ms = started.elapsed().as_millis(),
                "Loaded Memopedia tree"
            );
        } else {
            tracing::debug!(persona_id = %persona_id, "Discarded stale tree response");
        }
        Ok(())
    }

    /// Switches persona and reloads the tree and, if any, the selected page.
    ///
    /// Both fetches run concurrently. The selection is kept as is.
    ///
    /// # Errors
    ///
    /// Returns the tree error if the tree fetch failed, otherwise the page error.
    pub async fn set_persona(&self, persona_id: impl Into<String>) -> Result<()> {
        let persona_id = persona_id.into();
        tracing::info!(persona_id = %persona_id, "Switching persona");
        self.lock().persona_id = persona_id;

        let (tree, page) = tokio::join!(self.load_tree(), self.reload_page());
        tree.and(page)
    }

    /// Changes the selected page.
    ///
    /// `None` clears the content immediately without fetching. A new id fetches
    /// its content; re-selecting the current id does nothing.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors; the previous content is kept.
    pub async fn select_page(&self, page_id: Option<PageId>) -> Result<()> {
        {
            let mut state = self.lock();
            if state.selected_page_id == page_id {
                return Ok(());
            }
            state.selected_page_id.clone_from(&page_id);
            if page_id.is_none() {
                state.page_content.clear();
                // Outstanding page fetches are now stale and will not clear the flag.
                self.page_requests.fetch_add(1, Ordering::SeqCst);
                if self.options.discard_stale {
                    state.is_loading_page = false;
                }
                return Ok(());
            }
        }

        self.reload_page().await
    }

    /// Fetches the content of the currently selected page again.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors; the previous content is kept.
    #[instrument(skip(self))]
    pub async fn reload_page(&self) -> Result<()> {
        let (token, persona_id, page_id) = {
            let mut state = self.lock();
            let Some(page_id) = state.selected_page_id.clone() else {
                return Ok(());
            };
            let token = self.page_requests.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading_page = true;
            (token, state.persona_id.clone(), page_id)
        };
        let _loading = LoadingGuard::new(self, FetchKind::Page, token);

        let page = self
            .source
            .fetch_page(&persona_id, page_id.as_str())
            .await?;

        if self.is_current(FetchKind::Page, token) {
            self.lock().page_content = page.content;
        } else {
            tracing::debug!(page_id = %page_id, "Discarded stale page response");
        }
        Ok(())
    }

    /// Replaces the search text. Results are derived from it on read.
    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().query = query.into();
    }

    /// Restores query and selection from view parameters.
    ///
    /// Absent parameters leave the corresponding state alone.
    ///
    /// # Errors
    ///
    /// Propagates the page fetch error when a page is restored.
    pub async fn apply_view_params(&self, params: &ViewParams) -> Result<()> {
        if let Some(q) = &params.q {
            self.set_query(q.clone());
        }
        match &params.page {
            Some(page) => self.select_page(Some(PageId::new(page.clone()))).await,
            None => Ok(()),
        }
    }

    /// The `page`/`q` parameters describing the current state.
    #[must_use]
    pub fn view_params(&self) -> ViewParams {
        self.lock().view_params()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    const fn counter(&self, kind: FetchKind) -> &AtomicU64 {
        match kind {
            FetchKind::Tree => &self.tree_requests,
            FetchKind::Page => &self.page_requests,
        }
    }

    /// Whether a resolution with `token` may write state.
    fn is_current(&self, kind: FetchKind, token: u64) -> bool {
        !self.options.discard_stale || self.counter(kind).load(Ordering::SeqCst) == token
    }
}

/// Clears a loading flag when a fetch settles, however it settles.
struct LoadingGuard<'a, S: MemopediaSource> {
    orchestrator: &'a QueryOrchestrator<S>,
    kind: FetchKind,
    token: u64,
}

impl<'a, S: MemopediaSource> LoadingGuard<'a, S> {
    const fn new(orchestrator: &'a QueryOrchestrator<S>, kind: FetchKind, token: u64) -> Self {
        Self {
            orchestrator,
            kind,
            token,
        }
    }
}

impl<S: MemopediaSource> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        if !self.orchestrator.is_current(self.kind, self.token) {
            return;
        }
        let mut state = self.orchestrator.lock();
        match self.kind {
            FetchKind::Tree => state.is_loading_tree = false,
            FetchKind::Page => state.is_loading_page = false,
        }
    }
}
