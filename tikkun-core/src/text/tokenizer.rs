//! Whitespace tokenizer
//!
//! Punctuation stays attached to its token; boundary handling belongs to the
//! matcher.

/// A whitespace-delimited unit and its position in the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    /// Token text, never empty, never containing whitespace
    pub text: &'a str,
    /// 0-based ordinal in the token sequence
    pub ordinal: usize,
    /// Byte offset of the token in the source text
    pub offset: usize,
}

/// Split text into tokens on Unicode whitespace
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &text[s..idx],
                    ordinal: tokens.len(),
                    offset: s,
                });
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &text[s..],
            ordinal: tokens.len(),
            offset: s,
        });
    }

    tokens
}

/// Join token texts with single spaces
pub fn join(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len() + 1).sum());
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(token.text);
    }
    out
}

/// Concatenate token texts without separators
pub fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}
