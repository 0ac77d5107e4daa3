//! CLI command for searching a persona's Memopedia.

use super::{OutputFormat, open_orchestrator, write_json, write_yaml};
use crate::config::MemopediaConfig;
use crate::models::{Category, SearchResult};
use serde::Serialize;
use std::io::{self, Write};

/// One search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Category of the matching page.
    pub category: Category,
    /// Page id.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Page summary.
    pub summary: String,
}

impl From<&SearchResult<'_>> for SearchHit {
    fn from(result: &SearchResult<'_>) -> Self {
        Self {
            category: result.category,
            id: result.page.id().to_string(),
            title: result.page.title().to_string(),
            summary: result.page.page.summary.clone(),
        }
    }
}

/// Writes results as `[category] title` lines, in result order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_results_table<W: Write>(writer: &mut W, results: &[SearchResult<'_>]) -> io::Result<()> {
    if results.is_empty() {
        writeln!(writer, "No pages found.")?;
        return Ok(());
    }
    for result in results {
        writeln!(writer, "[{}] {}", result.category, result.page.title())?;
    }
    Ok(())
}

/// Keeps only the results in `only`, or all of them when it is `None`.
pub fn retain_category(results: &mut Vec<SearchResult<'_>>, only: Option<Category>) {
    if let Some(only) = only {
        results.retain(|result| result.category == only);
    }
}

/// Executes the search command.
///
/// # Errors
///
/// Returns an error if the persona is missing, the fetch fails, or output fails.
pub async fn cmd_search(
    config: &MemopediaConfig,
    query: &str,
    persona: Option<&str>,
    category: Option<Category>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = open_orchestrator(config, persona)?;
    orchestrator.load_tree().await?;
    orchestrator.set_query(query);
    let state = orchestrator.snapshot();
    let mut results = state.search_results();
    retain_category(&mut results, category);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Table => {
            write_results_table(&mut handle, &results)?;
            Ok(())
        },
        OutputFormat::Json => {
            let hits: Vec<SearchHit> = results.iter().map(SearchHit::from).collect();
            write_json(&mut handle, &hits)
        },
        OutputFormat::Yaml => {
            let hits: Vec<SearchHit> = results.iter().map(SearchHit::from).collect();
            write_yaml(&mut handle, &hits)
        },
    }
}
