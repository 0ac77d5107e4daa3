//! Binary entry point for memopedia.
//!
//! This binary browses and searches a persona's Memopedia from the terminal.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use memopedia::cli::{self, OutputFormat};
use memopedia::config::MemopediaConfig;
use memopedia::models::Category;
use memopedia::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Memopedia - browse a persona's knowledge base.
#[derive(Parser)]
#[command(name = "memopedia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the page trees of every category.
    Tree {
        /// Persona id (defaults to the configured persona).
        #[arg(short, long, env = "MEMOPEDIA_PERSONA")]
        persona: Option<String>,

        /// Restrict output to one category: people, terms, or plans.
        #[arg(long)]
        category: Option<Category>,

        /// Output format: table, json, or yaml.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Search page titles, summaries and keywords.
    Search {
        /// The search query.
        query: String,

        /// Persona id (defaults to the configured persona).
        #[arg(short, long, env = "MEMOPEDIA_PERSONA")]
        persona: Option<String>,

        /// Restrict output to one category: people, terms, or plans.
        #[arg(long)]
        category: Option<Category>,

        /// Output format: table, json, or yaml.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the content of one page.
    Show {
        /// Page id.
        page_id: String,

        /// Persona id (defaults to the configured persona).
        #[arg(short, long, env = "MEMOPEDIA_PERSONA")]
        persona: Option<String>,
    },

    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match MemopediaConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(
    command: Commands,
    config: &MemopediaConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Tree {
            persona,
            category,
            format,
        } => cli::cmd_tree(config, persona.as_deref(), category, parse_format(&format)).await,
        Commands::Search {
            query,
            persona,
            category,
            format,
        } => {
            cli::cmd_search(
                config,
                &query,
                persona.as_deref(),
                category,
                parse_format(&format),
            )
            .await
        },
        Commands::Show { page_id, persona } => {
            cli::cmd_show(config, &page_id, persona.as_deref()).await
        },
        Commands::Config => cli::cmd_config(config),
    }
}

fn parse_format(format: &str) -> OutputFormat {
    format.parse().unwrap_or_default()
}
