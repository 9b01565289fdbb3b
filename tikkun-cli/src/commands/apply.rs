//! Apply command implementation

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tikkun_core::{ConfirmedFix, EngineConfig};

use super::scan::{propagator, suggest};
use crate::book::Book;
use crate::error::{CliError, CliResult};
use crate::output::{formatter, OutputFormat};

/// Arguments for the apply command
#[derive(Debug, Args)]
#[command(group = clap::ArgGroup::new("targets").required(true).args(["paragraph", "all"]))]
pub struct ApplyArgs {
    /// Book file (JSON); rewritten in place
    #[arg(short, long, value_name = "FILE")]
    pub book: PathBuf,

    /// Word to replace
    #[arg(long, value_name = "WORD")]
    pub from: String,

    /// Replacement
    #[arg(long, value_name = "WORD")]
    pub to: String,

    /// Paragraph to correct (repeatable)
    #[arg(short, long, value_name = "ID")]
    pub paragraph: Vec<String>,

    /// Correct every paragraph the scan finds
    #[arg(long)]
    pub all: bool,

    /// Paragraph to leave out when using --all
    #[arg(short, long, value_name = "ID", requires = "all")]
    pub exclude: Option<String>,

    /// Also match the word behind a one-letter Hebrew prefix
    #[arg(long)]
    pub allow_prefix: bool,

    /// Show what would change without writing the book file
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ApplyArgs {
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        let mut book = Book::open(&self.book)?;
        let propagator = propagator(&book, config, self.allow_prefix);

        let fix = if self.all {
            let suggestions = suggest(
                &propagator,
                &book,
                self.exclude.as_deref(),
                &self.from,
                &self.to,
            )?;
            let suggestion = suggestions.first().ok_or_else(|| {
                CliError::NothingToApply(format!("'{}' does not occur in the book", self.from))
            })?;
            ConfirmedFix::from(suggestion)
        } else {
            ConfirmedFix {
                original_word: self.from.clone(),
                corrected_word: self.to.clone(),
                paragraph_ids: self.paragraph.clone(),
                fix_type: None,
            }
        };

        if self.dry_run {
            let suggestions = suggest(&propagator, &book, None, &self.from, &self.to)?;
            let targeted: Vec<_> = suggestions
                .into_iter()
                .map(|mut s| {
                    s.paragraphs.retain(|p| fix.paragraph_ids.contains(&p.id));
                    s
                })
                .filter(|s| !s.paragraphs.is_empty())
                .collect();
            return formatter(self.format, out).suggestions(&targeted);
        }

        let report = propagator.apply_bulk_fixes(book.id(), &[fix])?;
        if !report.updated_paragraphs.is_empty() || report.corrections_recorded > 0 {
            book.save()?;
        } else {
            log::info!("nothing changed; {} left untouched", book.path().display());
        }
        formatter(self.format, out).report(&report)
    }
}
