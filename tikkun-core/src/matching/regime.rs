//! Boundary regimes
//!
//! A target word is classified into one regime, and the regime decides which
//! neighboring characters disqualify a match. Hyphens disqualify in every
//! regime so compound terms are never split.

use unicode_normalization::char::is_combining_mark;

use crate::config::EngineConfig;
use crate::text::script;

/// Script-specific word boundary rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Word contains Hebrew letters
    Hebrew,
    /// Word is all ASCII digits
    Numeric,
    /// Anything else
    Generic,
}

impl Regime {
    /// Pick the regime for a target word
    pub fn classify(word: &str) -> Regime {
        if script::contains_hebrew(word) {
            Regime::Hebrew
        } else if !word.is_empty() && word.chars().all(|ch| ch.is_ascii_digit()) {
            Regime::Numeric
        } else {
            Regime::Generic
        }
    }
}

/// Immutable boundary tables shared by every matcher built from one config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRules {
    prefixes: Vec<char>,
    hyphens: Vec<char>,
    decimal_separators: Vec<char>,
}

impl BoundaryRules {
    /// Build tables from explicit character lists
    pub fn new(prefixes: Vec<char>, hyphens: Vec<char>, decimal_separators: Vec<char>) -> Self {
        Self {
            prefixes,
            hyphens,
            decimal_separators,
        }
    }

    /// Build tables from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.hebrew.prefixes.clone(),
            config.boundaries.hyphens.clone(),
            config.boundaries.decimal_separators.clone(),
        )
    }

    /// Attachable one-letter prefixes
    pub fn prefixes(&self) -> &[char] {
        &self.prefixes
    }

    /// Whether `ch` next to a word of this regime disqualifies the match
    pub fn blocks(&self, regime: Regime, ch: char) -> bool {
        if self.hyphens.contains(&ch) {
            return true;
        }
        match regime {
            // Hebrew punctuation (sof pasuq, geresh, paseq) separates words
            Regime::Hebrew => script::is_hebrew_letter(ch) || is_combining_mark(ch),
            Regime::Numeric => ch.is_ascii_digit() || self.decimal_separators.contains(&ch),
            Regime::Generic => {
                ch.is_alphabetic() || ch.is_numeric() || is_combining_mark(ch) || ch == '_'
            }
        }
    }

    /// Body of a regex character class matching exactly the blocking characters
    pub fn class_body(&self, regime: Regime) -> String {
        let mut body = match regime {
            Regime::Hebrew => format!(r"{}\p{{M}}", script::hebrew_letter_class()),
            Regime::Numeric => {
                let mut body = String::from("0-9");
                for &ch in &self.decimal_separators {
                    push_class_char(&mut body, ch);
                }
                body
            }
            Regime::Generic => String::from(r"\p{Alphabetic}\p{N}\p{M}_"),
        };
        for &ch in &self.hyphens {
            push_class_char(&mut body, ch);
        }
        body
    }

    /// Body of a regex character class matching the prefix letters
    pub fn prefix_class_body(&self) -> String {
        let mut body = String::new();
        for &ch in &self.prefixes {
            push_class_char(&mut body, ch);
        }
        body
    }
}

fn push_class_char(body: &mut String, ch: char) {
    if matches!(ch, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        body.push('\\');
    }
    body.push(ch);
}

/// Regex source for the word itself; inner whitespace matches any run
pub fn word_pattern(word: &str) -> String {
    word.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> BoundaryRules {
        BoundaryRules::from_config(&EngineConfig::hebrew())
    }

    #[test]
    fn test_regime_classification() {
        assert_eq!(Regime::classify("שלום"), Regime::Hebrew);
        assert_eq!(Regime::classify("שָׁלוֹם,"), Regime::Hebrew);
        assert_eq!(Regime::classify("ב-2"), Regime::Hebrew);
        assert_eq!(Regime::classify("2024"), Regime::Numeric);
        assert_eq!(Regime::classify("3.5"), Regime::Generic);
        assert_eq!(Regime::classify("hello"), Regime::Generic);
    }

    #[test]
    fn test_blocking_characters() {
        let rules = rules();
        assert!(rules.blocks(Regime::Hebrew, 'א'));
        assert!(rules.blocks(Regime::Hebrew, '\u{05B8}'));
        assert!(rules.blocks(Regime::Hebrew, '־'));
        assert!(rules.blocks(Regime::Hebrew, '-'));
        assert!(!rules.blocks(Regime::Hebrew, ','));
        assert!(!rules.blocks(Regime::Hebrew, 'a'));
        assert!(!rules.blocks(Regime::Hebrew, '׃'));
        assert!(!rules.blocks(Regime::Hebrew, '׳'));
        assert!(!rules.blocks(Regime::Hebrew, '״'));
        assert!(!rules.blocks(Regime::Hebrew, '׀'));

        assert!(rules.blocks(Regime::Numeric, '7'));
        assert!(rules.blocks(Regime::Numeric, '.'));
        assert!(rules.blocks(Regime::Numeric, ','));
        assert!(rules.blocks(Regime::Numeric, '-'));
        assert!(!rules.blocks(Regime::Numeric, 'ב'));

        assert!(rules.blocks(Regime::Generic, 'x'));
        assert!(rules.blocks(Regime::Generic, '9'));
        assert!(rules.blocks(Regime::Generic, 'ש'));
        assert!(!rules.blocks(Regime::Generic, '.'));
        assert!(!rules.blocks(Regime::Generic, ' '));
    }

    #[test]
    fn test_class_bodies_agree_with_blocks() {
        let rules = rules();
        let samples = [
            'א', 'ת', 'ם', '\u{05B8}', '\u{05BC}', '׃', '׳', '״', '־', '-', '׀', ',', '.', ' ', 'a',
            '7', '_',
        ];
        for regime in [Regime::Hebrew, Regime::Numeric, Regime::Generic] {
            let re = regex::Regex::new(&format!("^[{}]$", rules.class_body(regime))).unwrap();
            for ch in samples {
                assert_eq!(
                    re.is_match(&ch.to_string()),
                    rules.blocks(regime, ch),
                    "{regime:?} {ch}"
                );
            }
        }
    }

    #[test]
    fn test_class_bodies_compile() {
        let rules = rules();
        for regime in [Regime::Hebrew, Regime::Numeric, Regime::Generic] {
            let pattern = format!("[{}]", rules.class_body(regime));
            assert!(regex::Regex::new(&pattern).is_ok(), "{pattern}");
        }
        let prefixes = format!("[{}]", rules.prefix_class_body());
        let re = regex::Regex::new(&prefixes).unwrap();
        assert!(re.is_match("ו"));
        assert!(!re.is_match("א"));
    }

    #[test]
    fn test_word_pattern_flexible_whitespace() {
        let re = regex::Regex::new(&word_pattern("טק סט")).unwrap();
        assert!(re.is_match("טק  סט"));
        assert!(re.is_match("טק\nסט"));
        let re = regex::Regex::new(&word_pattern("a.b")).unwrap();
        assert!(!re.is_match("axb"));
    }
}
