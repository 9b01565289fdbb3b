//! Edit command implementation

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tikkun_core::{CorrectionPropagator, EngineConfig};

use super::diff::read_text;
use crate::book::Book;
use crate::error::{CliError, CliResult};
use crate::output::{formatter, OutputFormat};

/// Arguments for the edit command
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Book file (JSON); rewritten in place
    #[arg(short, long, value_name = "FILE")]
    pub book: PathBuf,

    /// Paragraph being edited
    #[arg(short, long, value_name = "ID")]
    pub paragraph: String,

    /// File holding the new paragraph content
    #[arg(short, long, value_name = "FILE")]
    pub content: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Drop the line ending editors append to a saved file
fn trim_final_newline(content: &str) -> &str {
    content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content)
}

impl EditArgs {
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        let mut book = Book::open(&self.book)?;
        if !book.has_paragraph(&self.paragraph) {
            return Err(CliError::UnknownParagraph(self.paragraph.clone()).into());
        }
        let content = read_text(&self.content)?;
        let content = trim_final_newline(&content);

        let propagator = CorrectionPropagator::new(book.store(), config);
        let changes = propagator.record_paragraph_edit(book.id(), &self.paragraph, content)?;
        log::info!(
            "paragraph {} edited with {} word change(s)",
            self.paragraph,
            changes.len()
        );

        let unchanged = book
            .file()
            .paragraphs
            .iter()
            .any(|p| p.id == self.paragraph && p.content == content);
        if !unchanged {
            book.save()?;
        }
        formatter(self.format, out).changes(&changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_final_newline() {
        assert_eq!(trim_final_newline("שלום\n"), "שלום");
        assert_eq!(trim_final_newline("שלום\r\n"), "שלום");
        assert_eq!(trim_final_newline("שלום\n\n"), "שלום\n");
        assert_eq!(trim_final_newline("שלום"), "שלום");
    }
}
