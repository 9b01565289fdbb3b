//! Script-aware whole-word matching and replacement
//!
//! A [`BoundaryMatcher`] finds the "real" occurrences of a word: matches that
//! sit inside a longer word, a number or a hyphenated compound are rejected.
//! Matching is exact, so niqqud on either side must agree.
//!
//! ```
//! use tikkun_core::matching::BoundaryMatcher;
//! use tikkun_core::EngineConfig;
//!
//! let matcher = BoundaryMatcher::new(&EngineConfig::hebrew());
//! assert!(matcher.find("12", "2").unwrap().is_empty());
//! assert_eq!(matcher.replace("ילד, ילדים", "ילד", "יֶלֶד").unwrap(), "יֶלֶד, ילדים");
//! ```

pub mod pattern;
pub mod regime;
pub mod strategy;

use std::sync::Arc;

pub use pattern::{WordMatch, WordPattern};
pub use regime::{BoundaryRules, Regime};
pub use strategy::MatchStrategy;

use crate::config::EngineConfig;
use crate::error::MatchResult;

/// Whole-word matcher configured once and shared across calls
#[derive(Debug, Clone)]
pub struct BoundaryMatcher {
    rules: Arc<BoundaryRules>,
    strategy: MatchStrategy,
    allow_prefix: bool,
}

impl BoundaryMatcher {
    /// Matcher using the configured boundaries, prefix policy and strategy
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rules: Arc::new(BoundaryRules::from_config(config)),
            strategy: MatchStrategy::resolve(config.matching.strategy),
            allow_prefix: config.hebrew.allow_prefix,
        }
    }

    /// Force a strategy, bypassing the probe
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Let one of the configured prefix letters precede Hebrew matches
    pub fn with_prefix(mut self, allow: bool) -> Self {
        self.allow_prefix = allow;
        self
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn allow_prefix(&self) -> bool {
        self.allow_prefix
    }

    pub fn rules(&self) -> &BoundaryRules {
        &self.rules
    }

    /// Compile a word for repeated use across many texts
    pub fn compile(&self, word: &str) -> MatchResult<WordPattern> {
        WordPattern::compile(word, &self.rules, self.strategy, self.allow_prefix)
    }

    pub fn find(&self, text: &str, word: &str) -> MatchResult<Vec<WordMatch>> {
        self.compile(word)?.find(text)
    }

    pub fn count(&self, text: &str, word: &str) -> MatchResult<usize> {
        self.compile(word)?.count(text)
    }

    /// Replace all non-overlapping occurrences of `word` in one pass
    pub fn replace(&self, text: &str, word: &str, replacement: &str) -> MatchResult<String> {
        self.compile(word)?.replace(text, replacement)
    }
}

impl Default for BoundaryMatcher {
    fn default() -> Self {
        Self::new(&EngineConfig::hebrew())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    fn matchers() -> Vec<BoundaryMatcher> {
        let base = BoundaryMatcher::default();
        let mut all = vec![base.clone().with_strategy(MatchStrategy::CaptureTrim)];
        if strategy::probe() == MatchStrategy::Lookaround {
            all.push(base.with_strategy(MatchStrategy::Lookaround));
        }
        all
    }

    fn starts(matcher: &BoundaryMatcher, text: &str, word: &str) -> Vec<usize> {
        matcher
            .find(text, word)
            .unwrap()
            .iter()
            .map(|m| m.start)
            .collect()
    }

    #[test]
    fn test_no_false_positives() {
        for m in matchers() {
            assert!(m.find("12", "2").unwrap().is_empty(), "{}", m.strategy());
            assert!(m.find("ב-2", "2").unwrap().is_empty());
            assert!(m.find("ילדים", "ילד").unwrap().is_empty());
            assert!(m.find("3.2", "2").unwrap().is_empty());
            assert!(m.find("2,5", "2").unwrap().is_empty());
            assert!(m.find("בית־ספר", "ספר").unwrap().is_empty());
            assert!(m.find("cats", "cat").unwrap().is_empty());
            assert!(m.find("well-known", "known").unwrap().is_empty());
        }
    }

    #[test]
    fn test_real_occurrences() {
        for m in matchers() {
            assert_eq!(starts(&m, "2 ו-12 ו 2 סוף", "2"), vec![0, 11]);
            assert_eq!(starts(&m, "ילד, (ילד) ילד", "ילד"), vec![0, 9, 17]);
            assert_eq!(starts(&m, "the cat sat", "cat"), vec![4]);
            assert_eq!(starts(&m, "שלום world", "world"), vec![9]);
        }
    }

    #[test]
    fn test_hebrew_punctuation_separates_words() {
        for m in matchers() {
            assert_eq!(starts(&m, "ויאמר שלום׃", "שלום"), vec![11]);
            assert_eq!(starts(&m, "׳שלום׳", "שלום"), vec![2]);
            assert_eq!(starts(&m, "״שלום״ אמר", "שלום"), vec![2]);
            assert_eq!(starts(&m, "שלום ׀ עולם", "שלום"), vec![0]);
            assert_eq!(m.replace("ויאמר שלום׃", "שלום", "שָׁלוֹם").unwrap(), "ויאמר שָׁלוֹם׃");
        }
    }

    #[test]
    fn test_niqqud_is_significant() {
        const VOWELED: &str = "שָׁלוֹם";
        for m in matchers() {
            assert!(m.find(VOWELED, "שלום").unwrap().is_empty());
            assert!(m.find("שלום", VOWELED).unwrap().is_empty());
            assert_eq!(m.count(&format!("{VOWELED} שלום"), VOWELED).unwrap(), 1);
        }
    }

    #[test]
    fn test_prefix_policy() {
        for m in matchers() {
            assert!(m.find("וילד", "ילד").unwrap().is_empty());
            let with_prefix = m.clone().with_prefix(true);
            let found = with_prefix.find("וילד בילד אילד", "ילד").unwrap();
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].range(), 2..8);
            assert_eq!(
                with_prefix.replace("וילד בילד", "ילד", "נער").unwrap(),
                "ונער בנער"
            );
            assert!(with_prefix.find("ו-ילד", "ילד").unwrap().is_empty());
        }
    }

    #[test]
    fn test_phrase_with_flexible_whitespace() {
        for m in matchers() {
            assert_eq!(m.count("טק  סט ועוד טק סט", "טק סט").unwrap(), 2);
            assert_eq!(
                m.replace("טק\tסט!", "טק סט", "טקסט").unwrap(),
                "טקסט!"
            );
        }
    }

    #[test]
    fn test_replace_all_occurrences() {
        for m in matchers() {
            assert_eq!(
                m.replace("2 plus 2 is 22", "2", "two").unwrap(),
                "two plus two is 22"
            );
            assert_eq!(m.replace("nothing here", "x", "y").unwrap(), "nothing here");
        }
    }

    #[test]
    fn test_replace_is_stable_when_identity() {
        for m in matchers() {
            let text = "ילד ראה ילד אחר, ילדים";
            let again = m.replace(text, "ילד", "ילד").unwrap();
            assert_eq!(again, text);
        }
    }

    #[test]
    fn test_empty_word() {
        let m = BoundaryMatcher::default();
        assert_eq!(m.find("text", ""), Err(MatchError::EmptyWord));
    }

    #[test]
    fn test_forced_lookaround_compiles_or_reports_unsupported() {
        let m = BoundaryMatcher::default().with_strategy(MatchStrategy::Lookaround);
        match m.find("וילד ילד", "ילד") {
            Ok(found) => assert_eq!(found.len(), 1),
            Err(err) => assert!(matches!(err, MatchError::PatternUnsupported(_))),
        }
    }
}
