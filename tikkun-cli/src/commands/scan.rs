//! Scan command implementation

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tikkun_core::{
    BoundaryMatcher, BulkFixSuggestion, CorrectionPropagator, EngineConfig, MemoryStore,
    WordChange,
};

use crate::book::Book;
use crate::error::CliResult;
use crate::output::{formatter, OutputFormat};

/// Arguments for the scan command
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Book file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub book: PathBuf,

    /// Word to look for
    #[arg(long, value_name = "WORD")]
    pub from: String,

    /// Its correction
    #[arg(long, value_name = "WORD")]
    pub to: String,

    /// Paragraph to leave out, usually the one already corrected
    #[arg(short, long, value_name = "ID")]
    pub exclude: Option<String>,

    /// Also match the word behind a one-letter Hebrew prefix
    #[arg(long)]
    pub allow_prefix: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Propagator over `book`, with the prefix policy widened on request
pub(crate) fn propagator(
    book: &Book,
    config: &EngineConfig,
    allow_prefix: bool,
) -> CorrectionPropagator<MemoryStore> {
    let propagator = CorrectionPropagator::new(book.store(), config);
    if allow_prefix {
        let matcher = BoundaryMatcher::new(config).with_prefix(true);
        propagator.with_matcher(matcher)
    } else {
        propagator
    }
}

/// Suggestions for one word pair
pub(crate) fn suggest(
    propagator: &CorrectionPropagator<MemoryStore>,
    book: &Book,
    exclude: Option<&str>,
    from: &str,
    to: &str,
) -> CliResult<Vec<BulkFixSuggestion>> {
    let change = WordChange::new(from, to, 0);
    Ok(propagator.scan(book.id(), exclude, &[change])?)
}

impl ScanArgs {
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        let book = Book::open(&self.book)?;
        let propagator = propagator(&book, config, self.allow_prefix);
        let suggestions = suggest(
            &propagator,
            &book,
            self.exclude.as_deref(),
            &self.from,
            &self.to,
        )?;
        log::info!(
            "{} occurrence(s) of '{}' in book {}",
            suggestions.iter().map(|s| s.total_occurrences()).sum::<usize>(),
            self.from,
            book.id()
        );
        formatter(self.format, out).suggestions(&suggestions)
    }
}
