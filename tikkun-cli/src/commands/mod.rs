//! CLI command implementations

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Subcommand;
use tikkun_core::matching::strategy;
use tikkun_core::{EngineConfig, FixType, MatchStrategy};

use crate::error::{CliError, CliResult};
use crate::output::{formatter, OutputFormat};

pub mod apply;
pub mod classify;
pub mod diff;
pub mod edit;
pub mod scan;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Align two versions of a text and classify every changed word
    Diff(diff::DiffArgs),

    /// Classify a single (original, corrected) word pair
    Classify(classify::ClassifyArgs),

    /// Find other occurrences of a correction in a book
    Scan(scan::ScanArgs),

    /// Apply a correction to paragraphs of a book
    Apply(apply::ApplyArgs),

    /// Record an edited paragraph and its word-level corrections
    Edit(edit::EditArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text", global = true)]
        format: OutputFormat,
    },
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List the fix-type tag vocabulary
    FixTypes,

    /// List boundary matching strategies and the one this build selects
    Strategies,
}

impl Commands {
    /// Run the command, writing results to stdout
    pub fn execute(&self, config: &EngineConfig) -> CliResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run(config, &mut out)
    }

    /// Run the command against an arbitrary writer
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        match self {
            Commands::Diff(args) => args.run(config, out),
            Commands::Classify(args) => args.run(config, out),
            Commands::Scan(args) => args.run(config, out),
            Commands::Apply(args) => args.run(config, out),
            Commands::Edit(args) => args.run(config, out),
            Commands::List { subcommand, format } => list(*subcommand, *format, out),
        }
    }
}

fn list<W: Write>(subcommand: ListCommands, format: OutputFormat, out: &mut W) -> CliResult<()> {
    match subcommand {
        ListCommands::FixTypes => formatter(format, out).fix_types(FixType::all()),
        ListCommands::Strategies => {
            let selected = strategy::probe();
            for candidate in [MatchStrategy::Lookaround, MatchStrategy::CaptureTrim] {
                let marker = if candidate == selected { "*" } else { " " };
                writeln!(out, "{marker} {candidate}")?;
            }
            Ok(())
        }
    }
}

/// Engine configuration from `path`, or the embedded Hebrew default
pub fn load_config(path: Option<&Path>) -> CliResult<Arc<EngineConfig>> {
    match path {
        Some(path) => {
            log::info!("loading engine configuration from {}", path.display());
            let config = EngineConfig::from_file(path)
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
            Ok(Arc::new(config))
        }
        None => Ok(EngineConfig::hebrew()),
    }
}
