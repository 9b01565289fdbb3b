//! Pluggable handler chain
//!
//! Each [`FixTypeHandler`] recognizes one category. The chain asks every
//! handler in priority order; the first match decides the tag and the rest
//! are reported alongside it. The last handler falls back to the legacy rule
//! list; pairs it can only call a plain substitution resolve to
//! [`FixType::Default`].

use std::fmt;

use super::{Classification, FixClassifier, FixType, HeuristicClassifier};
use crate::config::EngineConfig;
use crate::error::ClassifyError;
use crate::text::script::{self, NiqqudChange};

/// A handler's verdict on one pair
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerMatch {
    pub fix_type: FixType,
    pub confidence: f32,
    pub reason: String,
}

impl HandlerMatch {
    pub fn new(fix_type: FixType, confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            fix_type,
            confidence,
            reason: reason.into(),
        }
    }
}

/// One category recognizer
pub trait FixTypeHandler: Send + Sync {
    /// Handler name for logs and errors
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the pair is not of this handler's category
    fn detect(&self, original: &str, corrected: &str)
        -> Result<Option<HandlerMatch>, ClassifyError>;
}

/// Classifier that runs a prioritized list of handlers
pub struct HandlerClassifier {
    handlers: Vec<Box<dyn FixTypeHandler>>,
}

impl HandlerClassifier {
    /// Built-in handlers in their standard priority order
    pub fn new(config: &EngineConfig) -> Self {
        Self::empty()
            .with_handler(SentenceBreakHandler::new(config.sentences.terminators.clone()))
            .with_handler(DialogueMarkingHandler::new(config.dialogue.marks.clone()))
            .with_handler(PunctuationHandler)
            .with_handler(VowelizationHandler)
            .with_handler(ExpansionHandler)
            .with_handler(DisambiguationHandler)
            .with_handler(LegacyRulesHandler)
    }

    /// Chain without handlers; everything classifies as `Default`
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler with the lowest priority so far
    pub fn with_handler(mut self, handler: impl FixTypeHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}

impl Default for HandlerClassifier {
    fn default() -> Self {
        Self::new(&EngineConfig::hebrew())
    }
}

impl fmt::Debug for HandlerClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerClassifier")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

impl FixClassifier for HandlerClassifier {
    fn classify(&self, original: &str, corrected: &str) -> Result<Classification, ClassifyError> {
        if original == corrected {
            return Ok(Classification::unchanged());
        }

        let mut found: Vec<HandlerMatch> = Vec::new();
        for handler in &self.handlers {
            if let Some(hit) = handler.detect(original, corrected)? {
                found.push(hit);
            }
        }

        let matches: Vec<FixType> = found.iter().map(|m| m.fix_type).collect();
        Ok(match found.into_iter().next() {
            Some(winner) => Classification {
                fix_type: winner.fix_type,
                confidence: winner.confidence,
                reason: winner.reason,
                matches,
            },
            None => Classification::fallback("no handler matched"),
        })
    }

    fn name(&self) -> &'static str {
        "handlers"
    }
}

fn without(text: &str, drop: impl Fn(char) -> bool) -> String {
    text.chars().filter(|&ch| !drop(ch)).collect()
}

/// Terminator added or removed with the words otherwise untouched
#[derive(Debug, Clone)]
pub struct SentenceBreakHandler {
    terminators: Vec<char>,
}

impl SentenceBreakHandler {
    pub fn new(terminators: Vec<char>) -> Self {
        Self { terminators }
    }

    fn terminator_count(&self, text: &str) -> usize {
        text.chars().filter(|ch| self.terminators.contains(ch)).count()
    }
}

impl FixTypeHandler for SentenceBreakHandler {
    fn name(&self) -> &'static str {
        "sentence_break"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let skeleton = |text: &str| {
            without(text, |ch| script::is_punctuation(ch) || self.terminators.contains(&ch))
        };
        if skeleton(original) != skeleton(corrected) {
            return Ok(None);
        }
        let before = self.terminator_count(original);
        let after = self.terminator_count(corrected);
        Ok(match after.cmp(&before) {
            std::cmp::Ordering::Greater => Some(HandlerMatch::new(
                FixType::SentenceBreak,
                0.9,
                "sentence terminator added",
            )),
            std::cmp::Ordering::Less => Some(HandlerMatch::new(
                FixType::SentenceBreak,
                0.85,
                "sentence terminator removed",
            )),
            std::cmp::Ordering::Equal => None,
        })
    }
}

/// Quotation marks or dialogue dashes added or removed around a word
#[derive(Debug, Clone)]
pub struct DialogueMarkingHandler {
    marks: Vec<char>,
}

impl DialogueMarkingHandler {
    pub fn new(marks: Vec<char>) -> Self {
        Self { marks }
    }
}

impl FixTypeHandler for DialogueMarkingHandler {
    fn name(&self) -> &'static str {
        "dialogue_marking"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let is_mark = |ch: char| self.marks.contains(&ch) || ch.is_whitespace();
        let core_before = original.trim_matches(is_mark);
        let core_after = corrected.trim_matches(is_mark);
        if core_before.is_empty() || core_before != core_after {
            return Ok(None);
        }
        Ok(Some(HandlerMatch::new(
            FixType::DialogueMarking,
            0.85,
            "dialogue marks changed at word edges",
        )))
    }
}

/// Punctuation-only difference
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationHandler;

impl FixTypeHandler for PunctuationHandler {
    fn name(&self) -> &'static str {
        "punctuation"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let same = without(original, script::is_punctuation) == without(corrected, script::is_punctuation);
        Ok(same.then(|| HandlerMatch::new(FixType::Punctuation, 0.8, "punctuation changed")))
    }
}

/// Diacritic-only difference
#[derive(Debug, Clone, Copy, Default)]
pub struct VowelizationHandler;

impl FixTypeHandler for VowelizationHandler {
    fn name(&self) -> &'static str {
        "vowelization"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        if script::strip_diacritics(original) != script::strip_diacritics(corrected) {
            return Ok(None);
        }
        let (confidence, reason) = match script::compare_niqqud(original, corrected) {
            Some(NiqqudChange::Added) => (0.95, "vowel points added"),
            Some(NiqqudChange::Removed) => (0.85, "vowel points removed"),
            Some(NiqqudChange::Changed) | None => (0.85, "vowel points changed"),
        };
        Ok(Some(HandlerMatch::new(FixType::Vowelization, confidence, reason)))
    }
}

const ABBREVIATION_MARKS: [char; 4] = ['״', '"', '׳', '\''];

/// Number or acronym written out in full
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionHandler;

impl ExpansionHandler {
    fn is_acronym(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        chars.iter().enumerate().any(|(i, ch)| {
            ABBREVIATION_MARKS.contains(ch) && i > 0 && script::is_hebrew_letter(chars[i - 1])
        })
    }

    fn letter_count(word: &str) -> usize {
        word.chars().filter(|ch| ch.is_alphabetic()).count()
    }
}

impl FixTypeHandler for ExpansionHandler {
    fn name(&self) -> &'static str {
        "expansion"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let has_digit = |text: &str| text.chars().any(|ch| ch.is_ascii_digit());
        if has_digit(original) && !has_digit(corrected) && Self::letter_count(corrected) > 0 {
            return Ok(Some(HandlerMatch::new(
                FixType::Expansion,
                0.85,
                "number spelled out",
            )));
        }
        if Self::is_acronym(original)
            && !corrected.chars().any(|ch| ABBREVIATION_MARKS.contains(&ch))
            && Self::letter_count(corrected) > Self::letter_count(original)
        {
            return Ok(Some(HandlerMatch::new(
                FixType::Expansion,
                0.8,
                "abbreviation expanded",
            )));
        }
        Ok(None)
    }
}

/// Vav or yod added or removed to disambiguate defective spelling
#[derive(Debug, Clone, Copy, Default)]
pub struct DisambiguationHandler;

impl FixTypeHandler for DisambiguationHandler {
    fn name(&self) -> &'static str {
        "disambiguation"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let before = script::strip_diacritics(original);
        let after = script::strip_diacritics(corrected);
        if before == after || !script::contains_hebrew(&before) {
            return Ok(None);
        }
        let is_mater = |ch: char| ch == 'ו' || ch == 'י';
        if without(&before, is_mater) != without(&after, is_mater) {
            return Ok(None);
        }
        Ok(Some(HandlerMatch::new(
            FixType::Disambiguation,
            0.75,
            "matres lectionis changed",
        )))
    }
}

/// Legacy rule list as the last resort
///
/// A bare `substitution` carries no information beyond "the word changed", so
/// it is left unmatched and the chain reports `Default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRulesHandler;

impl FixTypeHandler for LegacyRulesHandler {
    fn name(&self) -> &'static str {
        "legacy_rules"
    }

    fn detect(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<Option<HandlerMatch>, ClassifyError> {
        let verdict = HeuristicClassifier::new().classify(original, corrected)?;
        Ok(match verdict.fix_type {
            FixType::Substitution | FixType::Default => None,
            fix_type => Some(HandlerMatch::new(fix_type, verdict.confidence, verdict.reason)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(original: &str, corrected: &str) -> Classification {
        HandlerClassifier::default()
            .classify(original, corrected)
            .unwrap()
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            HandlerClassifier::default().handler_names(),
            vec![
                "sentence_break",
                "dialogue_marking",
                "punctuation",
                "vowelization",
                "expansion",
                "disambiguation",
                "legacy_rules"
            ]
        );
    }

    #[test]
    fn test_sentence_break() {
        let c = classify("הלך", "הלך.");
        assert_eq!(c.fix_type, FixType::SentenceBreak);
        // punctuation also recognizes it but loses on priority
        assert_eq!(
            c.matches,
            vec![FixType::SentenceBreak, FixType::Punctuation, FixType::HebrewLetterFix]
        );
        assert_eq!(classify("ילד. הלך", "ילד הלך").fix_type, FixType::SentenceBreak);
    }

    #[test]
    fn test_dialogue_marking() {
        assert_eq!(classify("שלום", "\"שלום").fix_type, FixType::DialogueMarking);
        assert_eq!(classify("–כן", "כן").fix_type, FixType::DialogueMarking);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(classify("שלום,", "שלום;").fix_type, FixType::Punctuation);
    }

    #[test]
    fn test_vowelization() {
        let c = classify("שלום", "שָׁלוֹם");
        assert_eq!(c.fix_type, FixType::Vowelization);
        assert_eq!(c.reason, "vowel points added");
        assert_eq!(classify("שָׁלוֹם", "שלום").reason, "vowel points removed");
    }

    #[test]
    fn test_expansion() {
        assert_eq!(classify("3", "שלושה").fix_type, FixType::Expansion);
        assert_eq!(classify("צה״ל", "צבא הגנה לישראל").fix_type, FixType::Expansion);
        assert_eq!(classify("פרופ׳", "פרופסור").fix_type, FixType::Expansion);
    }

    #[test]
    fn test_disambiguation() {
        assert_eq!(classify("שמר", "שומר").fix_type, FixType::Disambiguation);
        assert_eq!(classify("מדבר", "מידבר").fix_type, FixType::Disambiguation);
    }

    #[test]
    fn test_default_fallback() {
        let c = classify("כלב", "חתולים");
        assert_eq!(c.fix_type, FixType::Default);
        assert!(c.matches.is_empty());
        assert_eq!(classify("dog", "elephant").fix_type, FixType::Default);
    }

    #[test]
    fn test_legacy_rules_fill_the_gaps() {
        let c = classify("כתב", "כתר");
        assert_eq!(c.fix_type, FixType::HebrewSpelling);
        assert_eq!(c.matches, vec![FixType::HebrewSpelling]);
        assert_eq!(classify("colour", "colous").fix_type, FixType::CharacterSubstitution);
        assert_eq!(classify("color", "colour").fix_type, FixType::InsertionDeletion);
        assert_eq!(classify("כלב", "חתול").fix_type, FixType::HebrewLetterFix);
        assert_eq!(classify("cat", "category").fix_type, FixType::ExpansionContraction);
    }

    #[test]
    fn test_legacy_rules_rank_last() {
        // vowelization wins; the legacy niqqud tag is only reported
        let c = classify("שלום", "שָׁלוֹם");
        assert_eq!(c.fix_type, FixType::Vowelization);
        assert_eq!(c.matches, vec![FixType::Vowelization, FixType::NiqqudAddition]);
        assert_eq!(classify("שמר", "שומר").fix_type, FixType::Disambiguation);
    }

    #[test]
    fn test_identical_pair() {
        let c = classify("ספר", "ספר");
        assert_eq!(c.fix_type, FixType::Default);
        assert_eq!(c.reason, "no change");
    }

    struct Failing;

    impl FixTypeHandler for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn detect(&self, _: &str, _: &str) -> Result<Option<HandlerMatch>, ClassifyError> {
            Err(ClassifyError::new("failing", "boom"))
        }
    }

    #[test]
    fn test_handler_failure_surfaces() {
        let classifier = HandlerClassifier::empty().with_handler(Failing);
        let err = classifier.classify("a", "b").unwrap_err();
        assert_eq!(err.handler, "failing");
        // identical pairs never reach the handlers
        assert!(classifier.classify("a", "a").is_ok());
    }

    #[test]
    fn test_custom_handler_extends_chain() {
        struct Always;
        impl FixTypeHandler for Always {
            fn name(&self) -> &'static str {
                "always"
            }
            fn detect(&self, _: &str, _: &str) -> Result<Option<HandlerMatch>, ClassifyError> {
                Ok(Some(HandlerMatch::new(FixType::Substitution, 0.1, "always")))
            }
        }
        let classifier = HandlerClassifier::default().with_handler(Always);
        assert_eq!(classifier.classify("כלב", "חתולים").unwrap().fix_type, FixType::Substitution);
        assert_eq!(
            classifier.classify("שלום", "שָׁלוֹם").unwrap().matches,
            vec![FixType::Vowelization, FixType::NiqqudAddition, FixType::Substitution]
        );
    }
}
