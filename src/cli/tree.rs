//! CLI command for printing a persona's Memopedia trees.

use super::{OutputFormat, open_orchestrator, write_json, write_yaml};
use crate::Error;
use crate::config::MemopediaConfig;
use crate::models::{Category, MemopediaForest, PageNode};
use std::io::{self, Write};

/// Writes the forest as indented trees under category headings.
///
/// With `only` set, just that category is written. Trunk pages are marked
/// `*`, important pages `!`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_tree_table<W: Write>(
    writer: &mut W,
    forest: &MemopediaForest,
    only: Option<Category>,
) -> io::Result<()> {
    for (category, roots) in forest.iter() {
        if only.is_some_and(|only| only != category) {
            continue;
        }
        writeln!(writer, "{}", category.label())?;
        if roots.is_empty() {
            writeln!(writer, "  (no pages)")?;
            continue;
        }

        let mut stack: Vec<(&PageNode, usize)> = roots.iter().rev().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            writeln!(
                writer,
                "{:indent$}{} [{}]{}",
                "",
                node.title(),
                node.id(),
                markers(node),
                indent = depth * 2
            )?;
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }
    Ok(())
}

fn markers(node: &PageNode) -> String {
    let mut markers = String::new();
    if node.page.is_trunk {
        markers.push_str(" *");
    }
    if node.page.is_important {
        markers.push_str(" !");
    }
    markers
}

/// Executes the tree command.
///
/// # Errors
///
/// Returns an error if the persona is missing, the fetch fails, or output fails.
pub async fn cmd_tree(
    config: &MemopediaConfig,
    persona: Option<&str>,
    category: Option<Category>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = open_orchestrator(config, persona)?;
    orchestrator.load_tree().await?;
    let state = orchestrator.snapshot();
    let forest = state.forest.as_deref().ok_or_else(|| Error::OperationFailed {
        operation: "load_tree".to_string(),
        cause: "no forest after load".to_string(),
    })?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Table => {
            write_tree_table(&mut handle, forest, category)?;
            Ok(())
        },
        OutputFormat::Json => match category {
            Some(category) => write_json(&mut handle, forest.get(category)),
            None => write_json(&mut handle, forest),
        },
        OutputFormat::Yaml => match category {
            Some(category) => write_yaml(&mut handle, forest.get(category)),
            None => write_yaml(&mut handle, forest),
        },
    }
}
