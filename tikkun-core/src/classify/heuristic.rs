//! Rule-list classifier producing the legacy tag set

use super::{Classification, FixClassifier, FixType};
use crate::error::ClassifyError;
use crate::text::script::{self, NiqqudChange};

/// Diacritic-aware rules evaluated in a fixed priority order
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Tag for a pair; identical pairs have no legacy tag and map to `Default`
    pub fn tag(&self, original: &str, corrected: &str) -> FixType {
        self.evaluate(original, corrected).0
    }

    fn evaluate(&self, original: &str, corrected: &str) -> (FixType, f32, &'static str) {
        if original == corrected {
            return (FixType::Default, 1.0, "no change");
        }

        if script::strip_diacritics(original) == script::strip_diacritics(corrected) {
            return match script::compare_niqqud(original, corrected) {
                Some(NiqqudChange::Added) => (FixType::NiqqudAddition, 0.95, "diacritics added"),
                Some(NiqqudChange::Removed) => {
                    (FixType::NiqqudRemoval, 0.95, "diacritics removed")
                }
                // Same letters and marks in another encoding still count as a niqqud edit
                Some(NiqqudChange::Changed) | None => {
                    (FixType::NiqqudCorrection, 0.9, "diacritics changed")
                }
            };
        }

        let hebrew = script::contains_hebrew(original) || script::contains_hebrew(corrected);
        let before = original.chars().count();
        let after = corrected.chars().count();

        if before == after {
            return if hebrew {
                (FixType::HebrewSpelling, 0.8, "hebrew letters differ at equal length")
            } else {
                (FixType::CharacterSubstitution, 0.8, "characters differ at equal length")
            };
        }

        if before.abs_diff(after) == 1 {
            return if hebrew {
                (FixType::HebrewLetterFix, 0.75, "one hebrew letter inserted or deleted")
            } else {
                (FixType::InsertionDeletion, 0.75, "one character inserted or deleted")
            };
        }

        if original.contains(corrected) || corrected.contains(original) {
            return (
                FixType::ExpansionContraction,
                0.7,
                "one word contains the other",
            );
        }

        (FixType::Substitution, 0.6, "word replaced")
    }
}

impl FixClassifier for HeuristicClassifier {
    fn classify(&self, original: &str, corrected: &str) -> Result<Classification, ClassifyError> {
        let (fix_type, confidence, reason) = self.evaluate(original, corrected);
        if original == corrected {
            return Ok(Classification::unchanged());
        }
        Ok(Classification {
            fix_type,
            confidence,
            reason: reason.to_string(),
            matches: vec![fix_type],
        })
    }

    fn name(&self) -> &'static str {
        "legacy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(original: &str, corrected: &str) -> FixType {
        HeuristicClassifier::new().tag(original, corrected)
    }

    #[test]
    fn test_niqqud_rules() {
        assert_eq!(tag("שלום", "שָׁלוֹם"), FixType::NiqqudAddition);
        assert_eq!(tag("שָׁלוֹם", "שלום"), FixType::NiqqudRemoval);
        assert_eq!(tag("שָלוֹם", "שִלוֹם"), FixType::NiqqudCorrection);
    }

    #[test]
    fn test_length_rules() {
        assert_eq!(tag("כתב", "כתר"), FixType::HebrewSpelling);
        assert_eq!(tag("colour", "colous"), FixType::CharacterSubstitution);
        assert_eq!(tag("ספר", "ספרי"), FixType::HebrewLetterFix);
        assert_eq!(tag("color", "colour"), FixType::InsertionDeletion);
    }

    #[test]
    fn test_containment_and_fallback() {
        assert_eq!(tag("ביה", "ביהכנס"), FixType::ExpansionContraction);
        assert_eq!(tag("cat", "category"), FixType::ExpansionContraction);
        assert_eq!(tag("dog", "elephant"), FixType::Substitution);
    }

    #[test]
    fn test_only_legacy_tags_for_real_changes() {
        let pairs = [("a", "b"), ("שלום", "שָׁלוֹם"), ("ab", "abcd"), ("x", "yyyy")];
        for (o, c) in pairs {
            assert!(tag(o, c).is_legacy(), "{o} -> {c}");
        }
    }

    #[test]
    fn test_identical_pair() {
        let c = HeuristicClassifier::new().classify("ספר", "ספר").unwrap();
        assert_eq!(c.fix_type, FixType::Default);
        assert_eq!(c.reason, "no change");
        assert!(c.matches.is_empty());
    }
}
