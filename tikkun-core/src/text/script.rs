//! Script detection and diacritic handling
//!
//! Hebrew letters live in U+05D0..=U+05EA (plus the presentation forms block);
//! niqqud and cantillation marks are combining marks in the same block, so
//! stripping them goes through canonical decomposition.

use smallvec::SmallVec;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Hebrew Unicode block
pub const HEBREW_BLOCK: (char, char) = ('\u{0590}', '\u{05FF}');

/// Hebrew presentation forms (precomposed letters with dagesh, shin dots...)
pub const HEBREW_PRESENTATION_FORMS: (char, char) = ('\u{FB1D}', '\u{FB4F}');

/// Presentation-forms code points that are not letters: the varika point
/// and the alternative plus sign
const PRESENTATION_NON_LETTERS: [char; 2] = ['\u{FB1E}', '\u{FB29}'];

/// Hebrew letter (alef through tav, including final forms)
#[inline]
pub fn is_hebrew_letter(ch: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&ch)
        || ((HEBREW_PRESENTATION_FORMS.0..=HEBREW_PRESENTATION_FORMS.1).contains(&ch)
            && !PRESENTATION_NON_LETTERS.contains(&ch))
}

/// Regex class body matching exactly the characters of [`is_hebrew_letter`]
pub fn hebrew_letter_class() -> String {
    let mut body = String::from("\u{05D0}-\u{05EA}");
    let mut start = HEBREW_PRESENTATION_FORMS.0;
    for gap in PRESENTATION_NON_LETTERS {
        if start < gap {
            body.push_str(&format!("{start}-{}", prev_char(gap)));
        }
        start = next_char(gap);
    }
    body.push_str(&format!("{start}-{}", HEBREW_PRESENTATION_FORMS.1));
    body
}

fn prev_char(ch: char) -> char {
    char::from_u32(ch as u32 - 1).unwrap_or(ch)
}

fn next_char(ch: char) -> char {
    char::from_u32(ch as u32 + 1).unwrap_or(ch)
}

/// Any character of the Hebrew script blocks (letters, marks, punctuation)
#[inline]
pub fn is_hebrew_char(ch: char) -> bool {
    (HEBREW_BLOCK.0..=HEBREW_BLOCK.1).contains(&ch)
        || (HEBREW_PRESENTATION_FORMS.0..=HEBREW_PRESENTATION_FORMS.1).contains(&ch)
}

/// Word contains at least one Hebrew letter
pub fn contains_hebrew(word: &str) -> bool {
    word.chars().any(is_hebrew_letter)
}

/// Diacritic or vowel mark
#[inline]
pub fn is_diacritic(ch: char) -> bool {
    is_combining_mark(ch)
}

/// Remove every diacritic mark, returning base letters only
pub fn strip_diacritics(word: &str) -> String {
    word.nfd().filter(|&ch| !is_diacritic(ch)).collect()
}

/// Whether the word carries any diacritic
pub fn has_diacritics(word: &str) -> bool {
    word.nfd().any(is_diacritic)
}

/// Punctuation in the ASCII, Latin-1, general punctuation and Hebrew ranges
pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(
            ch,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{05BE}'
                | '\u{05C0}'
                | '\u{05C3}'
                | '\u{05C6}'
                | '\u{05F3}'
                | '\u{05F4}'
                | '\u{0589}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
        )
}

/// How a diacritic-only edit changed the marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NiqqudChange {
    /// Marks were only added
    Added,
    /// Marks were only removed
    Removed,
    /// Marks were both added and removed, or swapped
    Changed,
}

type MarkCluster = (char, SmallVec<[char; 4]>);

/// Split a word into base characters and the sorted marks attached to each
fn mark_clusters(word: &str) -> Vec<MarkCluster> {
    let mut clusters: Vec<MarkCluster> = Vec::new();
    for ch in word.nfd() {
        if is_diacritic(ch) {
            match clusters.last_mut() {
                Some((_, marks)) => marks.push(ch),
                // A leading mark has no base; give it a placeholder cluster.
                None => clusters.push(('\u{25CC}', SmallVec::from_slice(&[ch]))),
            }
        } else {
            clusters.push((ch, SmallVec::new()));
        }
    }
    for (_, marks) in &mut clusters {
        marks.sort_unstable();
    }
    clusters
}

/// Both slices sorted; every mark of `small` appears in `big`
fn is_sub_multiset(small: &[char], big: &[char]) -> bool {
    let mut big = big.iter().copied();
    'outer: for &ch in small {
        for candidate in big.by_ref() {
            if candidate == ch {
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// Compare two words that differ only in diacritics.
///
/// Returns `None` when the base letters differ or the words are identical.
pub fn compare_niqqud(original: &str, corrected: &str) -> Option<NiqqudChange> {
    let before = mark_clusters(original);
    let after = mark_clusters(corrected);

    if before.len() != after.len() || before.iter().zip(&after).any(|(a, b)| a.0 != b.0) {
        return None;
    }

    let mut added = false;
    let mut removed = false;
    for ((_, old), (_, new)) in before.iter().zip(&after) {
        if old == new {
            continue;
        }
        if is_sub_multiset(old, new) {
            added = true;
        } else if is_sub_multiset(new, old) {
            removed = true;
        } else {
            return Some(NiqqudChange::Changed);
        }
    }

    match (added, removed) {
        (false, false) => None,
        (true, false) => Some(NiqqudChange::Added),
        (false, true) => Some(NiqqudChange::Removed),
        (true, true) => Some(NiqqudChange::Changed),
    }
}
