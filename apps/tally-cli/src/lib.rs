//! # tally-cli: Command-Line Front End for Tally
//!
//! Thin orchestration over `tally-core`: load configuration, read a
//! document file, run the engine, print the result.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tally totals <file>   load ──► Document::summary ──► summary panel      │
//! │  tally check <file>    load ──► issue checks (no number) ──► "ok"        │
//! │  tally issue <file>    load ──► Document::issue ──► document JSON        │
//! │                                     ▲                                   │
//! │                                     └── SequentialNumberAllocator        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr; stdout carries only command output.

pub mod config;
pub mod error;
pub mod input;
pub mod numbering;
pub mod summary;

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use tally_core::validation::validate_currency_code;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::input::load_document;
use crate::numbering::SequentialNumberAllocator;
use crate::summary::render_summary;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the totals panel for a document file
    Totals {
        file: PathBuf,
    },

    /// Validate a document file as it would be on issue
    Check {
        file: PathBuf,
    },

    /// Issue a document: assign a number, freeze totals, print as JSON
    Issue {
        file: PathBuf,

        /// First sequence number handed out
        #[arg(long, default_value_t = 1)]
        start: u64,
    },
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - ERROR: command failures
/// - WARN: recoverable problems
/// - INFO: issued documents
/// - DEBUG: per-line calculation details
///
/// Override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command and returns what should be printed to stdout.
pub fn run(command: &Command, config: &AppConfig) -> AppResult<String> {
    match command {
        Command::Totals { file } => {
            let doc = load_document(file, config)?;
            Ok(render_summary(&doc.summary(), config))
        }

        Command::Check { file } => {
            let doc = load_document(file, config)?;
            validate_currency_code(&doc.currency_code).map_err(tally_core::CoreError::from)?;
            let summary = doc.summary();
            Ok(format!(
                "ok: {} line(s), total {}\n",
                doc.lines.len(),
                config.format_currency(summary.totals.total_cents)
            ))
        }

        Command::Issue { file, start } => {
            let mut doc = load_document(file, config)?;
            let numbers = SequentialNumberAllocator::new(config.numbering.clone(), *start);
            doc.issue(&numbers, Utc::now())?;
            info!(
                number = doc.number.as_deref().unwrap_or_default(),
                path = %file.display(),
                "issued from file"
            );
            let mut json = serde_json::to_string_pretty(&doc).map_err(AppError::Serialize)?;
            json.push('\n');
            Ok(json)
        }
    }
}
