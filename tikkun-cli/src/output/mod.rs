//! Output formatting module

use anyhow::Result;
use std::io::Write;
use tikkun_core::{ApplyReport, BulkFixSuggestion, Classification, FixType, WordChange};

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Classified changes between two texts
    fn changes(&mut self, changes: &[WordChange]) -> Result<()>;

    /// Classification of a single word pair
    fn classification(
        &mut self,
        original: &str,
        corrected: &str,
        classification: &Classification,
    ) -> Result<()>;

    /// Bulk fix suggestions with previews
    fn suggestions(&mut self, suggestions: &[BulkFixSuggestion]) -> Result<()>;

    /// Result of a bulk apply
    fn report(&mut self, report: &ApplyReport) -> Result<()>;

    /// Tag vocabulary
    fn fix_types(&mut self, fix_types: &[FixType]) -> Result<()>;
}

/// Formatter for `format` writing to `writer`
pub fn formatter<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputFormatter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
    }
}
