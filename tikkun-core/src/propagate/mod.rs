//! Book-wide correction propagation
//!
//! [`CorrectionPropagator`] scans a book for other occurrences of corrected
//! words, builds reviewable previews, and applies confirmed fixes inside one
//! store transaction. [`BulkFixSession`] wraps the scan/apply cycle in an
//! explicit state machine.

mod preview;
mod session;

pub use preview::location;
pub use session::{BulkFixSession, SessionState};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::{build_classifier, FixClassifier, FixType};
use crate::config::EngineConfig;
use crate::error::{PropagationError, Result, StoreError};
use crate::matching::{BoundaryMatcher, WordPattern};
use crate::model::{
    BulkFixSuggestion, ConfirmedFix, CorrectionRecord, Paragraph, ParagraphPreview, WordChange,
};
use crate::store::{BookStore, UnitOfWork};
use crate::text::{script, tokenize, SentenceLocator, WordAligner};

/// Outcome of a committed bulk apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Paragraphs whose content changed, in processing order
    pub updated_paragraphs: Vec<String>,
    /// Requested paragraphs that no longer exist
    pub missing_paragraphs: Vec<String>,
    pub corrections_recorded: usize,
    /// Rows the correction log refused
    pub rejected_corrections: usize,
    /// Occurrences replaced but not recorded because classification failed
    pub unclassified_occurrences: usize,
    /// Fixes whose re-classification disagreed with the reviewed tag
    pub classification_mismatches: usize,
}

struct PreparedFix<'f> {
    fix: &'f ConfirmedFix,
    original: &'f str,
    corrected: &'f str,
    pattern: WordPattern,
    fix_type: Option<FixType>,
}

/// Diff, classify and propagate corrections against a [`BookStore`]
pub struct CorrectionPropagator<S> {
    store: Arc<S>,
    matcher: BoundaryMatcher,
    classifier: Arc<dyn FixClassifier>,
    locator: SentenceLocator,
    aligner: WordAligner,
}

impl<S: BookStore> CorrectionPropagator<S> {
    /// Propagator with the matcher, classifier and sentence rules of `config`
    pub fn new(store: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            store,
            matcher: BoundaryMatcher::new(config),
            classifier: build_classifier(config),
            locator: SentenceLocator::from_config(config),
            aligner: WordAligner::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: BoundaryMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FixClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn matcher(&self) -> &BoundaryMatcher {
        &self.matcher
    }

    pub fn classifier(&self) -> &dyn FixClassifier {
        self.classifier.as_ref()
    }

    /// Start a scan/apply cycle
    pub fn session(&self) -> BulkFixSession<'_, S> {
        BulkFixSession::new(self)
    }

    /// Find other occurrences of each change in the book and preview them.
    ///
    /// Never writes. Identical pairs are dropped, edge punctuation shared by
    /// both words is trimmed, duplicate pairs collapse into one suggestion,
    /// and changes with no occurrence yield nothing.
    pub fn scan(
        &self,
        book_id: &str,
        exclude_id: Option<&str>,
        changes: &[WordChange],
    ) -> Result<Vec<BulkFixSuggestion>> {
        let mut seen = HashSet::new();
        let changes: Vec<(&str, &str, Option<FixType>)> = changes
            .iter()
            .filter(|c| c.is_effective())
            .map(|c| {
                let (original, corrected) = shared_core(&c.original_word, &c.corrected_word);
                (original, corrected, c.fix_type)
            })
            .filter(|(original, corrected, _)| seen.insert((*original, *corrected)))
            .collect();
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let paragraphs = self.store.get_book_paragraphs(book_id, exclude_id)?;
        debug!(
            "scanning {} paragraph(s) of book {book_id} for {} change(s)",
            paragraphs.len(),
            changes.len()
        );

        let mut suggestions = Vec::new();
        for (original, corrected, fix_type) in changes {
            let pattern = self.matcher.compile(original)?;
            let previews = self.preview_all(&pattern, corrected, &paragraphs)?;
            if previews.is_empty() {
                continue;
            }
            let fix_type = match fix_type {
                Some(fix_type) => fix_type,
                None => self.scan_fix_type(original, corrected),
            };
            suggestions.push(BulkFixSuggestion {
                original_word: original.to_string(),
                corrected_word: corrected.to_string(),
                fix_type,
                paragraphs: previews,
            });
        }

        info!(
            "scan of book {book_id} produced {} suggestion(s)",
            suggestions.len()
        );
        Ok(suggestions)
    }

    fn scan_fix_type(&self, original: &str, corrected: &str) -> FixType {
        match self.classifier.classify(original, corrected) {
            Ok(classification) => classification.fix_type,
            Err(err) => {
                warn!("classification failed for '{original}' -> '{corrected}': {err}");
                FixType::Default
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn preview_all(
        &self,
        pattern: &WordPattern,
        replacement: &str,
        paragraphs: &[Paragraph],
    ) -> Result<Vec<ParagraphPreview>> {
        let previews = paragraphs
            .par_iter()
            .map(|p| preview::preview_paragraph(pattern, replacement, p, &self.locator))
            .collect::<Result<Vec<_>>>()?;
        Ok(previews.into_iter().flatten().collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn preview_all(
        &self,
        pattern: &WordPattern,
        replacement: &str,
        paragraphs: &[Paragraph],
    ) -> Result<Vec<ParagraphPreview>> {
        let mut previews = Vec::new();
        for p in paragraphs {
            if let Some(preview) =
                preview::preview_paragraph(pattern, replacement, p, &self.locator)?
            {
                previews.push(preview);
            }
        }
        Ok(previews)
    }

    /// Apply confirmed fixes to their paragraphs in one transaction.
    ///
    /// Paragraphs are processed by page number then order index; fixes inside
    /// a paragraph run in the order given. Correction contexts quote the
    /// paragraph as stored before this call. Missing paragraphs are skipped,
    /// refused correction rows are skipped, and any fatal storage error rolls
    /// the whole call back.
    pub fn apply_bulk_fixes(&self, book_id: &str, fixes: &[ConfirmedFix]) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let prepared = self.prepare(fixes, &mut report)?;
        let tts = self.store.get_tts_settings(book_id)?;

        // paragraph id -> indices into `prepared`, in first-seen order
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (index, item) in prepared.iter().enumerate() {
            let mut seen = HashSet::new();
            for id in item.fix.paragraph_ids.iter().filter(|id| seen.insert(*id)) {
                match groups.iter_mut().find(|(gid, _)| gid == id) {
                    Some((_, members)) => members.push(index),
                    None => groups.push((id.clone(), vec![index])),
                }
            }
        }

        let result = self.store.transaction(|uow| -> Result<ApplyReport> {
            let mut updated: Vec<String> = Vec::new();
            let fatal = |source: StoreError, updated: &[String]| PropagationError::Storage {
                source,
                updated_before_failure: updated.to_vec(),
            };

            let mut loaded: Vec<(Paragraph, &[usize])> = Vec::new();
            for (id, members) in &groups {
                match uow.get_paragraph(id).map_err(|e| fatal(e, &updated))? {
                    Some(paragraph) if paragraph.book_id == book_id => {
                        loaded.push((paragraph, members.as_slice()))
                    }
                    _ => {
                        warn!("paragraph {id} not found in book {book_id}, skipping");
                        report.missing_paragraphs.push(id.clone());
                    }
                }
            }
            loaded.sort_by_key(|(paragraph, _)| paragraph.reading_order());

            for (paragraph, members) in loaded {
                let mut content = paragraph.content.clone();
                let mut records = Vec::new();
                for &index in members {
                    let item = &prepared[index];
                    let matches = item.pattern.find(&content)?;
                    if matches.is_empty() {
                        continue;
                    }
                    match item.fix_type {
                        Some(fix_type) => {
                            // occurrences an earlier fix created have no stored
                            // sentence and quote the working text instead
                            let stored = item.pattern.find(&paragraph.content)?;
                            for (k, m) in matches.iter().enumerate() {
                                let context = match stored.get(k) {
                                    Some(at) => {
                                        self.locator.sentence(&paragraph.content, at.range())
                                    }
                                    None => self.locator.sentence(&content, m.range()),
                                };
                                records.push(CorrectionRecord::new(
                                    book_id,
                                    &paragraph.id,
                                    item.original,
                                    item.corrected,
                                    context,
                                    fix_type,
                                    &tts,
                                    Utc::now(),
                                ));
                            }
                        }
                        None => report.unclassified_occurrences += matches.len(),
                    }
                    content = item.pattern.replace(&content, item.corrected)?;
                }

                if content == paragraph.content {
                    continue;
                }
                uow.update_paragraph_content(&paragraph.id, &content)
                    .map_err(|e| fatal(e, &updated))?;
                updated.push(paragraph.id.clone());
                debug!(
                    "paragraph {} updated, {} correction(s) pending",
                    paragraph.id,
                    records.len()
                );
                record_corrections(uow, records, &mut report).map_err(|e| fatal(e, &updated))?;
            }

            report.updated_paragraphs = updated.clone();
            Ok(report)
        });

        match &result {
            Ok(report) => info!(
                "applied {} fix(es) to book {book_id}: {} paragraph(s) updated, {} correction(s) recorded",
                fixes.len(),
                report.updated_paragraphs.len(),
                report.corrections_recorded
            ),
            Err(err) => warn!("bulk apply to book {book_id} rolled back: {err}"),
        }
        result
    }

    /// Compile patterns and re-classify each fix before touching storage
    fn prepare<'f>(
        &self,
        fixes: &'f [ConfirmedFix],
        report: &mut ApplyReport,
    ) -> Result<Vec<PreparedFix<'f>>> {
        let mut prepared = Vec::new();
        for fix in fixes {
            if fix.original_word == fix.corrected_word || fix.original_word.trim().is_empty() {
                debug!("ignoring no-op fix '{}'", fix.original_word);
                continue;
            }
            let (original, corrected) = shared_core(&fix.original_word, &fix.corrected_word);
            let pattern = self.matcher.compile(original)?;
            let fix_type = match self.classifier.classify(original, corrected) {
                Ok(classification) => {
                    if let Some(expected) = fix.fix_type {
                        if expected != classification.fix_type {
                            warn!(
                                "'{original}' -> '{corrected}' reviewed as {expected} but re-classified as {}",
                                classification.fix_type
                            );
                            report.classification_mismatches += 1;
                        }
                    }
                    Some(classification.fix_type)
                }
                Err(err) => {
                    warn!(
                        "classification failed for '{original}' -> '{corrected}', occurrences will not be recorded: {err}"
                    );
                    None
                }
            };
            prepared.push(PreparedFix {
                fix,
                original,
                corrected,
                pattern,
                fix_type,
            });
        }
        Ok(prepared)
    }

    /// Record an editor's change to one paragraph.
    ///
    /// Aligns the stored content with `new_content`, classifies every change,
    /// writes the new content and logs one correction per classified change,
    /// atomically. The returned changes feed [`CorrectionPropagator::scan`].
    pub fn record_paragraph_edit(
        &self,
        book_id: &str,
        paragraph_id: &str,
        new_content: &str,
    ) -> Result<Vec<WordChange>> {
        let tts = self.store.get_tts_settings(book_id)?;
        self.store.transaction(|uow| -> Result<Vec<WordChange>> {
            let paragraph = uow
                .get_paragraph(paragraph_id)?
                .filter(|p| p.book_id == book_id)
                .ok_or_else(|| PropagationError::ParagraphNotFound(paragraph_id.to_string()))?;
            if paragraph.content == new_content {
                return Ok(Vec::new());
            }

            let mut changes = self.aligner.align(&paragraph.content, new_content);
            let mut records = Vec::new();
            for change in &mut changes {
                match self
                    .classifier
                    .classify(&change.original_word, &change.corrected_word)
                {
                    Ok(classification) => {
                        change.fix_type = Some(classification.fix_type);
                        let context = self.edit_context(&paragraph.content, new_content, change)?;
                        records.push(CorrectionRecord::new(
                            book_id,
                            paragraph_id,
                            &change.original_word,
                            &change.corrected_word,
                            &context,
                            classification.fix_type,
                            &tts,
                            Utc::now(),
                        ));
                    }
                    Err(err) => warn!(
                        "classification failed for '{}' -> '{}', not recorded: {err}",
                        change.original_word, change.corrected_word
                    ),
                }
            }

            uow.update_paragraph_content(paragraph_id, new_content)?;
            let mut report = ApplyReport::default();
            record_corrections(uow, records, &mut report)?;
            info!(
                "paragraph {paragraph_id} edited: {} change(s), {} recorded",
                changes.len(),
                report.corrections_recorded
            );
            Ok(changes)
        })
    }

    /// Sentence of the new content holding the corrected word nearest the anchor
    fn edit_context(&self, old: &str, new: &str, change: &WordChange) -> Result<String> {
        let old_tokens = tokenize(old);
        let anchor = old_tokens
            .get(change.position)
            .map(|t| t.offset)
            .unwrap_or(0);
        let occurrences = self.matcher.find(new, &change.corrected_word)?;
        if let Some(nearest) = occurrences.iter().min_by_key(|m| m.start.abs_diff(anchor)) {
            return Ok(self.locator.sentence(new, nearest.range()).to_string());
        }
        let span = old_tokens
            .get(change.position)
            .map(|t| t.offset..t.offset + t.text.len())
            .unwrap_or(0..0);
        Ok(self.locator.sentence(old, span).to_string())
    }
}

/// Trim edge punctuation both words carry unchanged, so `שלום,` -> `שָׁלוֹם,`
/// also reaches a bare `שלום`. Pairs that edit their edge punctuation keep it,
/// and a pair that would trim to nothing is returned whole.
fn shared_core<'w>(original: &'w str, corrected: &'w str) -> (&'w str, &'w str) {
    fn leading(word: &str) -> &str {
        &word[..word.len() - word.trim_start_matches(script::is_punctuation).len()]
    }
    fn trailing(word: &str) -> &str {
        &word[word.trim_end_matches(script::is_punctuation).len()..]
    }

    let (mut o, mut c) = (original, corrected);
    if leading(o) == leading(c) {
        o = &o[leading(o).len()..];
        c = &c[leading(c).len()..];
    }
    if trailing(o) == trailing(c) {
        o = &o[..o.len() - trailing(o).len()];
        c = &c[..c.len() - trailing(c).len()];
    }
    if o.is_empty() || c.is_empty() {
        return (original, corrected);
    }
    (o, c)
}

/// Insert a paragraph's records, falling back to row-by-row on a refused batch
fn record_corrections(
    uow: &mut dyn UnitOfWork,
    records: Vec<CorrectionRecord>,
    report: &mut ApplyReport,
) -> std::result::Result<(), StoreError> {
    if records.is_empty() {
        return Ok(());
    }
    let count = records.len();
    match uow.create_many_corrections(records.clone()) {
        Ok(()) => {
            report.corrections_recorded += count;
            Ok(())
        }
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!("batch of {count} correction(s) refused ({err}), inserting one by one");
            for record in records {
                match uow.create_correction(record) {
                    Ok(()) => report.corrections_recorded += 1,
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => {
                        warn!("skipping correction row: {err}");
                        report.rejected_corrections += 1;
                    }
                }
            }
            Ok(())
        }
    }
}

impl<S> std::fmt::Debug for CorrectionPropagator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionPropagator")
            .field("matcher", &self.matcher)
            .field("classifier", &self.classifier.name())
            .finish_non_exhaustive()
    }
}
