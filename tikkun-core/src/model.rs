//! Engine data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::FixType;

/// One semantic edit between an original and a corrected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordChange {
    /// Original word, or the space-joined phrase for a merge
    pub original_word: String,
    /// Corrected word, or the space-joined phrase for a split
    pub corrected_word: String,
    /// Ordinal of the first affected token in the original sequence
    pub position: usize,
    /// Classification, filled in after alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_type: Option<FixType>,
}

impl WordChange {
    /// Unclassified change
    pub fn new(
        original_word: impl Into<String>,
        corrected_word: impl Into<String>,
        position: usize,
    ) -> Self {
        Self {
            original_word: original_word.into(),
            corrected_word: corrected_word.into(),
            position,
            fix_type: None,
        }
    }

    /// Same change carrying a classification
    pub fn with_fix_type(mut self, fix_type: FixType) -> Self {
        self.fix_type = Some(fix_type);
        self
    }

    /// Whether the change actually changes anything
    pub fn is_effective(&self) -> bool {
        !self.original_word.trim().is_empty() && self.original_word != self.corrected_word
    }
}

/// Group key shared by every correction of the same word pair
pub fn aggregation_key(original_word: &str, corrected_word: &str) -> String {
    format!("{original_word}|{corrected_word}")
}

/// A paragraph as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub id: String,
    pub book_id: String,
    pub page_number: u32,
    pub order_index: u32,
    pub content: String,
}

impl Paragraph {
    /// Ordering key: page number, then order index within the page
    pub fn reading_order(&self) -> (u32, u32) {
        (self.page_number, self.order_index)
    }
}

/// TTS settings attached to correction records for traceability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsSettings {
    pub model: Option<String>,
    pub voice: Option<String>,
}

/// Append-only record of one applied correction occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionRecord {
    pub book_id: String,
    pub paragraph_id: String,
    pub original_word: String,
    pub corrected_word: String,
    pub aggregation_key: String,
    pub sentence_context: String,
    pub fix_type: FixType,
    pub tts_model: Option<String>,
    pub tts_voice: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CorrectionRecord {
    /// Build a record; the aggregation key is derived from the word pair
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        book_id: &str,
        paragraph_id: &str,
        original_word: &str,
        corrected_word: &str,
        sentence_context: &str,
        fix_type: FixType,
        tts: &TtsSettings,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            book_id: book_id.to_string(),
            paragraph_id: paragraph_id.to_string(),
            original_word: original_word.to_string(),
            corrected_word: corrected_word.to_string(),
            aggregation_key: aggregation_key(original_word, corrected_word),
            sentence_context: sentence_context.to_string(),
            fix_type,
            tts_model: tts.model.clone(),
            tts_voice: tts.voice.clone(),
            created_at,
        }
    }
}

/// Preview of one paragraph affected by a bulk fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphPreview {
    pub id: String,
    /// Human-readable location, "page N, paragraph M"
    pub location: String,
    pub page_number: u32,
    pub order_index: u32,
    pub occurrences: usize,
    pub preview_before: String,
    pub preview_after: String,
}

/// Reviewable suggestion to propagate one correction across a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFixSuggestion {
    pub original_word: String,
    pub corrected_word: String,
    pub fix_type: FixType,
    pub paragraphs: Vec<ParagraphPreview>,
}

impl BulkFixSuggestion {
    /// Total occurrences across all previewed paragraphs
    pub fn total_occurrences(&self) -> usize {
        self.paragraphs.iter().map(|p| p.occurrences).sum()
    }

    /// Paragraph ids in preview order, ready to confirm
    pub fn paragraph_ids(&self) -> Vec<String> {
        self.paragraphs.iter().map(|p| p.id.clone()).collect()
    }
}

/// A correction confirmed by the reviewer for a set of paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedFix {
    pub original_word: String,
    pub corrected_word: String,
    pub paragraph_ids: Vec<String>,
    /// Classification shown to the reviewer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_type: Option<FixType>,
}

impl From<&BulkFixSuggestion> for ConfirmedFix {
    fn from(suggestion: &BulkFixSuggestion) -> Self {
        Self {
            original_word: suggestion.original_word.clone(),
            corrected_word: suggestion.corrected_word.clone(),
            paragraph_ids: suggestion.paragraph_ids(),
            fix_type: Some(suggestion.fix_type),
        }
    }
}
