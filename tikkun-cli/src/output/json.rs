//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tikkun_core::{ApplyReport, BulkFixSuggestion, Classification, FixType, WordChange};

/// JSON formatter - one pretty-printed document per call
pub struct JsonFormatter<W: Write> {
    writer: W,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairClassification<'a> {
    original: &'a str,
    corrected: &'a str,
    #[serde(flatten)]
    classification: &'a Classification,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FixTypeEntry {
    name: &'static str,
    legacy: bool,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn changes(&mut self, changes: &[WordChange]) -> Result<()> {
        self.emit(changes)
    }

    fn classification(
        &mut self,
        original: &str,
        corrected: &str,
        classification: &Classification,
    ) -> Result<()> {
        self.emit(&PairClassification {
            original,
            corrected,
            classification,
        })
    }

    fn suggestions(&mut self, suggestions: &[BulkFixSuggestion]) -> Result<()> {
        self.emit(suggestions)
    }

    fn report(&mut self, report: &ApplyReport) -> Result<()> {
        self.emit(report)
    }

    fn fix_types(&mut self, fix_types: &[FixType]) -> Result<()> {
        let entries: Vec<FixTypeEntry> = fix_types
            .iter()
            .map(|t| FixTypeEntry {
                name: t.as_str(),
                legacy: t.is_legacy(),
            })
            .collect();
        self.emit(&entries)
    }
}
