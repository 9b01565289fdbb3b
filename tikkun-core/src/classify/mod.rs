//! Fix-type classification
//!
//! Two classifier generations share the [`FixClassifier`] interface: the
//! early rule list ([`HeuristicClassifier`]) and the pluggable handler chain
//! ([`HandlerClassifier`]). The configured one is built by
//! [`build_classifier`].

pub mod handlers;
pub mod heuristic;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use handlers::{
    DialogueMarkingHandler, DisambiguationHandler, ExpansionHandler, FixTypeHandler,
    HandlerClassifier, HandlerMatch, LegacyRulesHandler, PunctuationHandler,
    SentenceBreakHandler, VowelizationHandler,
};
pub use heuristic::HeuristicClassifier;

use crate::config::{ClassifierKind, EngineConfig};
use crate::error::ClassifyError;

/// Category of a word correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    NiqqudAddition,
    NiqqudRemoval,
    NiqqudCorrection,
    HebrewSpelling,
    HebrewLetterFix,
    ExpansionContraction,
    CharacterSubstitution,
    InsertionDeletion,
    Substitution,
    Vowelization,
    Punctuation,
    SentenceBreak,
    DialogueMarking,
    Expansion,
    Disambiguation,
    Default,
}

impl FixType {
    const ALL: [FixType; 16] = [
        FixType::NiqqudAddition,
        FixType::NiqqudRemoval,
        FixType::NiqqudCorrection,
        FixType::HebrewSpelling,
        FixType::HebrewLetterFix,
        FixType::ExpansionContraction,
        FixType::CharacterSubstitution,
        FixType::InsertionDeletion,
        FixType::Substitution,
        FixType::Vowelization,
        FixType::Punctuation,
        FixType::SentenceBreak,
        FixType::DialogueMarking,
        FixType::Expansion,
        FixType::Disambiguation,
        FixType::Default,
    ];

    /// Whole tag vocabulary, legacy tags first
    pub fn all() -> &'static [FixType] {
        &Self::ALL
    }

    /// Tag produced by the heuristic classifier generation
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            FixType::NiqqudAddition
                | FixType::NiqqudRemoval
                | FixType::NiqqudCorrection
                | FixType::HebrewSpelling
                | FixType::HebrewLetterFix
                | FixType::ExpansionContraction
                | FixType::CharacterSubstitution
                | FixType::InsertionDeletion
                | FixType::Substitution
        )
    }

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            FixType::NiqqudAddition => "niqqud_addition",
            FixType::NiqqudRemoval => "niqqud_removal",
            FixType::NiqqudCorrection => "niqqud_correction",
            FixType::HebrewSpelling => "hebrew_spelling",
            FixType::HebrewLetterFix => "hebrew_letter_fix",
            FixType::ExpansionContraction => "expansion_contraction",
            FixType::CharacterSubstitution => "character_substitution",
            FixType::InsertionDeletion => "insertion_deletion",
            FixType::Substitution => "substitution",
            FixType::Vowelization => "vowelization",
            FixType::Punctuation => "punctuation",
            FixType::SentenceBreak => "sentence_break",
            FixType::DialogueMarking => "dialogue_marking",
            FixType::Expansion => "expansion",
            FixType::Disambiguation => "disambiguation",
            FixType::Default => "default",
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixType::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown fix type '{s}'"))
    }
}

/// Result of classifying one word pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub fix_type: FixType,
    /// 0.0..=1.0
    pub confidence: f32,
    pub reason: String,
    /// Every category that recognized the pair, winner first
    pub matches: Vec<FixType>,
}

impl Classification {
    /// Catch-all result
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            fix_type: FixType::Default,
            confidence: 0.5,
            reason: reason.into(),
            matches: Vec::new(),
        }
    }

    pub(crate) fn unchanged() -> Self {
        Self {
            fix_type: FixType::Default,
            confidence: 1.0,
            reason: "no change".to_string(),
            matches: Vec::new(),
        }
    }
}

/// Strategy interface over classifier generations
pub trait FixClassifier: Send + Sync {
    /// Classify an (original, corrected) pair; never returns an absent tag
    fn classify(&self, original: &str, corrected: &str) -> Result<Classification, ClassifyError>;

    /// Name for logging
    fn name(&self) -> &'static str;

    /// Tag only
    fn fix_type(&self, original: &str, corrected: &str) -> Result<FixType, ClassifyError> {
        self.classify(original, corrected).map(|c| c.fix_type)
    }
}

/// Build the classifier selected by configuration
pub fn build_classifier(config: &EngineConfig) -> Arc<dyn FixClassifier> {
    match config.classifier.kind {
        ClassifierKind::Handlers => Arc::new(HandlerClassifier::new(config)),
        ClassifierKind::Legacy => Arc::new(HeuristicClassifier::new()),
    }
}

/// Legacy heuristic tag for a pair
pub fn classify(original: &str, corrected: &str) -> FixType {
    HeuristicClassifier::new().tag(original, corrected)
}
