//! CLI command implementations.
//!
//! Each submodule implements one command; output is written to any
//! [`std::io::Write`] so commands can be tested without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tree` | Print a persona's Memopedia trees per category |
//! | `search` | Print pages matching a free-text query |
//! | `show` | Print the markdown content of one page |
//! | `config` | Print the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! memopedia tree --persona air
//! memopedia search "robot" --persona air --format json
//! memopedia show page-42 --persona air
//! ```

mod config;
mod search;
mod show;
mod tree;

pub use config::cmd_config;
pub use search::{SearchHit, cmd_search, retain_category, write_results_table};
pub use show::{cmd_show, write_content};
pub use tree::{cmd_tree, write_tree_table};

use crate::client::HttpMemopediaClient;
use crate::config::MemopediaConfig;
use crate::services::QueryOrchestrator;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "yaml" => Self::Yaml,
            _ => Self::Table,
        })
    }
}

/// Writes a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Writes a value as YAML.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_yaml<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let yaml = serde_yaml_ng::to_string(value)?;
    write!(writer, "{yaml}")?;
    Ok(())
}

/// Builds an orchestrator over HTTP for a persona.
fn open_orchestrator(
    config: &MemopediaConfig,
    persona: Option<&str>,
) -> crate::Result<QueryOrchestrator<HttpMemopediaClient>> {
    let persona_id = config.resolve_persona(persona)?;
    Ok(QueryOrchestrator::with_options(
        config.client()?,
        persona_id,
        config.orchestrator_options(),
    ))
}
