//! CLI command for printing one page.

use super::open_orchestrator;
use crate::config::MemopediaConfig;
use crate::models::PageId;
use crate::view::ContentPane;
use std::io::{self, Write};

/// Writes what the content pane shows, followed by a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_content<W: Write>(writer: &mut W, pane: ContentPane<'_>) -> io::Result<()> {
    let text = pane.text();
    if text.ends_with('\n') {
        write!(writer, "{text}")
    } else {
        writeln!(writer, "{text}")
    }
}

/// Executes the show command.
///
/// # Errors
///
/// Returns an error if the persona is missing, the fetch fails, or output fails.
pub async fn cmd_show(
    config: &MemopediaConfig,
    page_id: &str,
    persona: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = open_orchestrator(config, persona)?;
    orchestrator
        .select_page(Some(PageId::new(page_id)))
        .await?;
    let state = orchestrator.snapshot();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_content(&mut handle, state.content())?;
    Ok(())
}
