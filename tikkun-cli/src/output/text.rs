//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use tikkun_core::{ApplyReport, BulkFixSuggestion, Classification, FixType, WordChange};

/// Text formatter - one line per item, summaries last
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn list(&mut self, label: &str, ids: &[String]) -> Result<()> {
        if !ids.is_empty() {
            writeln!(self.writer, "{label}: {}", ids.join(", "))?;
        }
        Ok(())
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn changes(&mut self, changes: &[WordChange]) -> Result<()> {
        if changes.is_empty() {
            writeln!(self.writer, "No changes found")?;
            return Ok(());
        }
        for change in changes {
            let tag = change.fix_type.map(FixType::as_str).unwrap_or("-");
            writeln!(
                self.writer,
                "{:>5}  {} → {}  [{tag}]",
                change.position, change.original_word, change.corrected_word
            )?;
        }
        writeln!(self.writer, "Total changes: {}", changes.len())?;
        Ok(())
    }

    fn classification(
        &mut self,
        original: &str,
        corrected: &str,
        classification: &Classification,
    ) -> Result<()> {
        writeln!(self.writer, "{original} → {corrected}")?;
        writeln!(self.writer, "Fix type:   {}", classification.fix_type)?;
        writeln!(self.writer, "Confidence: {:.2}", classification.confidence)?;
        writeln!(self.writer, "Reason:     {}", classification.reason)?;
        if !classification.matches.is_empty() {
            let matches: Vec<&str> = classification.matches.iter().map(|t| t.as_str()).collect();
            writeln!(self.writer, "Matches:    {}", matches.join(", "))?;
        }
        Ok(())
    }

    fn suggestions(&mut self, suggestions: &[BulkFixSuggestion]) -> Result<()> {
        if suggestions.is_empty() {
            writeln!(self.writer, "No other occurrences found")?;
            return Ok(());
        }
        for suggestion in suggestions {
            writeln!(
                self.writer,
                "{} → {}  [{}]  {} occurrence(s) in {} paragraph(s)",
                suggestion.original_word,
                suggestion.corrected_word,
                suggestion.fix_type,
                suggestion.total_occurrences(),
                suggestion.paragraphs.len()
            )?;
            for preview in &suggestion.paragraphs {
                writeln!(self.writer, "  {} ({})", preview.id, preview.location)?;
                writeln!(self.writer, "    - {}", preview.preview_before)?;
                writeln!(self.writer, "    + {}", preview.preview_after)?;
            }
        }
        Ok(())
    }

    fn report(&mut self, report: &ApplyReport) -> Result<()> {
        if report.updated_paragraphs.is_empty() {
            writeln!(self.writer, "No paragraphs updated")?;
        } else {
            self.list("Updated paragraphs", &report.updated_paragraphs)?;
        }
        self.list("Missing paragraphs", &report.missing_paragraphs)?;
        writeln!(
            self.writer,
            "Corrections recorded: {}",
            report.corrections_recorded
        )?;
        if report.rejected_corrections > 0 {
            writeln!(
                self.writer,
                "Rejected corrections: {}",
                report.rejected_corrections
            )?;
        }
        if report.unclassified_occurrences > 0 {
            writeln!(
                self.writer,
                "Unclassified occurrences: {}",
                report.unclassified_occurrences
            )?;
        }
        if report.classification_mismatches > 0 {
            writeln!(
                self.writer,
                "Classification mismatches: {}",
                report.classification_mismatches
            )?;
        }
        Ok(())
    }

    fn fix_types(&mut self, fix_types: &[FixType]) -> Result<()> {
        for fix_type in fix_types {
            let generation = if fix_type.is_legacy() { "legacy" } else { "handler" };
            writeln!(self.writer, "{:<24}{generation}", fix_type.as_str())?;
        }
        Ok(())
    }
}
