//! Sentence spans for previews and correction context

use std::ops::Range;

use crate::config::EngineConfig;
use crate::text::script;

/// Locates the sentence(s) around a byte range
#[derive(Debug, Clone)]
pub struct SentenceLocator {
    terminators: Vec<char>,
    window: usize,
}

impl SentenceLocator {
    /// Create a locator with explicit terminators and fallback window radius
    pub fn new(terminators: Vec<char>, window: usize) -> Self {
        Self {
            terminators,
            window,
        }
    }

    /// Build from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.sentences.terminators.clone(),
            config.sentences.preview_window,
        )
    }

    /// Byte range of the sentence(s) covering `span`.
    ///
    /// Falls back to a window of `window` characters on each side when the
    /// text has no sentence terminator before or after the span.
    pub fn locate(&self, text: &str, span: Range<usize>) -> Range<usize> {
        let before = text[..span.start]
            .char_indices()
            .rev()
            .find(|&(idx, ch)| self.ends_sentence(text, idx, ch))
            .map(|(idx, ch)| idx + ch.len_utf8());

        // A terminator inside the span does not end the sentence; one at its
        // very end does.
        let search_from = text[span.start..span.end]
            .char_indices()
            .last()
            .map(|(idx, _)| span.start + idx)
            .unwrap_or(span.end);
        let after = text[search_from..]
            .char_indices()
            .find(|&(idx, ch)| self.ends_sentence(text, search_from + idx, ch))
            .map(|(idx, ch)| self.extend_run(text, search_from + idx + ch.len_utf8()));

        let range = match (before, after) {
            (None, None) => self.window_around(text, span),
            (start, end) => start.unwrap_or(0)..end.unwrap_or(text.len()),
        };
        trim_range(text, range)
    }

    /// Trimmed sentence text covering `span`
    pub fn sentence<'a>(&self, text: &'a str, span: Range<usize>) -> &'a str {
        &text[self.locate(text, span)]
    }

    fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    /// A terminator ends a sentence when followed by whitespace, end of text,
    /// or more punctuation (`?!`, `."`).
    fn ends_sentence(&self, text: &str, idx: usize, ch: char) -> bool {
        if !self.is_terminator(ch) {
            return false;
        }
        match text[idx + ch.len_utf8()..].chars().next() {
            None => true,
            Some(next) => next.is_whitespace() || script::is_punctuation(next),
        }
    }

    /// Swallow trailing terminators and closing punctuation after a sentence end
    fn extend_run(&self, text: &str, mut end: usize) -> usize {
        for ch in text[end..].chars() {
            if ch.is_whitespace() || !script::is_punctuation(ch) {
                break;
            }
            end += ch.len_utf8();
        }
        end
    }

    fn window_around(&self, text: &str, span: Range<usize>) -> Range<usize> {
        let start = text[..span.start]
            .char_indices()
            .rev()
            .take(self.window)
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(span.start);
        let end = text[span.end..]
            .char_indices()
            .nth(self.window)
            .map(|(idx, _)| span.end + idx)
            .unwrap_or(text.len());
        start..end
    }
}

fn trim_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    if leading == slice.len() {
        return range.start..range.start;
    }
    range.start + leading..range.end - trailing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> SentenceLocator {
        SentenceLocator::new(vec!['.', '!', '?', '׃'], 10)
    }

    fn span_of(text: &str, needle: &str) -> Range<usize> {
        let start = text.find(needle).unwrap();
        start..start + needle.len()
    }

    #[test]
    fn test_middle_sentence() {
        let text = "First one. The word is here. Last one.";
        let span = span_of(text, "word");
        assert_eq!(locator().sentence(text, span), "The word is here.");
    }

    #[test]
    fn test_first_and_last_sentence() {
        let text = "הילד הלך. הוא חזר הביתה";
        assert_eq!(locator().sentence(text, span_of(text, "הילד")), "הילד הלך.");
        assert_eq!(
            locator().sentence(text, span_of(text, "חזר")),
            "הוא חזר הביתה"
        );
    }

    #[test]
    fn test_multiple_terminators_and_quotes() {
        let text = "Really?!\" he said. Next.";
        assert_eq!(locator().sentence(text, span_of(text, "Really")), "Really?!\"");
    }

    #[test]
    fn test_decimal_dot_is_not_a_terminator() {
        let text = "Rates rose 3.5 percent today. Then fell.";
        assert_eq!(
            locator().sentence(text, span_of(text, "percent")),
            "Rates rose 3.5 percent today."
        );
    }

    #[test]
    fn test_word_carrying_its_own_terminator() {
        let text = "Go home. Stay there.";
        assert_eq!(locator().sentence(text, span_of(text, "home.")), "Go home.");
    }

    #[test]
    fn test_window_fallback_without_terminators() {
        let text = "aaaaaaaaaaaaaaaaaaaa target bbbbbbbbbbbbbbbbbbbb";
        let sentence = locator().sentence(text, span_of(text, "target"));
        assert_eq!(sentence, "aaaaaaaaa target bbbbbbbbb");
    }

    #[test]
    fn test_window_respects_multibyte_chars() {
        let text = "אבגדהוזחטיכלמנ מילה סעפצקרשתאבגדהוז";
        let sentence = locator().sentence(text, span_of(text, "מילה"));
        assert!(sentence.contains("מילה"));
        assert!(sentence.chars().count() <= "מילה".chars().count() + 20);
    }

    #[test]
    fn test_sof_pasuq() {
        let text = "בראשית ברא׃ והארץ היתה";
        assert_eq!(locator().sentence(text, span_of(text, "ברא")), "בראשית ברא׃");
    }
}
