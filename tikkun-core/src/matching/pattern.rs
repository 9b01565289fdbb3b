//! Compiled word patterns

use std::ops::Range;

use super::regime::{word_pattern, BoundaryRules, Regime};
use super::strategy::MatchStrategy;
use crate::error::{MatchError, MatchResult};

/// Byte span of one matched word; boundary and prefix characters are excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch {
    pub start: usize,
    pub end: usize,
}

impl WordMatch {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug)]
enum Engine {
    Lookaround(fancy_regex::Regex),
    CaptureTrim {
        regex: regex::Regex,
        rules: BoundaryRules,
    },
}

/// A target word compiled for one regime and strategy
#[derive(Debug)]
pub struct WordPattern {
    word: String,
    regime: Regime,
    engine: Engine,
}

impl WordPattern {
    /// Compile `word`; `allow_prefix` only takes effect for Hebrew words
    pub fn compile(
        word: &str,
        rules: &BoundaryRules,
        strategy: MatchStrategy,
        allow_prefix: bool,
    ) -> MatchResult<Self> {
        if word.trim().is_empty() {
            return Err(MatchError::EmptyWord);
        }
        let regime = Regime::classify(word);
        let blocked = rules.class_body(regime);
        let body = word_pattern(word);
        let prefix = (allow_prefix && regime == Regime::Hebrew && !rules.prefixes().is_empty())
            .then(|| rules.prefix_class_body());

        let engine = match strategy {
            MatchStrategy::Lookaround => {
                let left = match &prefix {
                    Some(p) => format!("(?:(?<![{blocked}])|(?<=(?<![{blocked}])[{p}]))"),
                    None => format!("(?<![{blocked}])"),
                };
                let source = format!("{left}(?:{body})(?![{blocked}])");
                let regex = fancy_regex::Regex::new(&source).map_err(|err| match &err {
                    fancy_regex::Error::CompileError(_) => {
                        MatchError::PatternUnsupported(err.to_string())
                    }
                    _ => MatchError::InvalidPattern {
                        word: word.to_string(),
                        reason: err.to_string(),
                    },
                })?;
                Engine::Lookaround(regex)
            }
            MatchStrategy::CaptureTrim => {
                let prefix_group = prefix
                    .map(|p| format!("(?P<prefix>[{p}])?"))
                    .unwrap_or_default();
                let source = format!("(?:^|[^{blocked}]){prefix_group}(?P<word>{body})");
                let regex = regex::Regex::new(&source).map_err(|err| MatchError::InvalidPattern {
                    word: word.to_string(),
                    reason: err.to_string(),
                })?;
                Engine::CaptureTrim {
                    regex,
                    rules: rules.clone(),
                }
            }
        };

        Ok(Self {
            word: word.to_string(),
            regime,
            engine,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// All non-overlapping occurrences, left to right
    pub fn find(&self, text: &str) -> MatchResult<Vec<WordMatch>> {
        match &self.engine {
            Engine::Lookaround(regex) => regex
                .find_iter(text)
                .map(|found| {
                    found
                        .map(|m| WordMatch {
                            start: m.start(),
                            end: m.end(),
                        })
                        .map_err(|err| MatchError::Execution(err.to_string()))
                })
                .collect(),
            Engine::CaptureTrim { regex, rules } => Ok(self.capture_trim(text, regex, rules)),
        }
    }

    fn capture_trim(&self, text: &str, regex: &regex::Regex, rules: &BoundaryRules) -> Vec<WordMatch> {
        let mut found = Vec::new();
        let mut search = 0;
        let mut last_end = 0;

        while search <= text.len() {
            let Some(caps) = regex.captures_at(text, search) else {
                break;
            };
            let (Some(whole), Some(word)) = (caps.get(0), caps.name("word")) else {
                break;
            };
            let trailing_ok = text[word.end()..]
                .chars()
                .next()
                .map_or(true, |ch| !rules.blocks(self.regime, ch));

            if word.start() >= last_end && trailing_ok {
                found.push(WordMatch {
                    start: word.start(),
                    end: word.end(),
                });
                last_end = word.end();
                // the word's last character may serve as the next left boundary
                search = prev_boundary(text, word.end());
            } else {
                search = next_boundary(text, whole.start());
            }
        }
        found
    }

    pub fn count(&self, text: &str) -> MatchResult<usize> {
        Ok(self.find(text)?.len())
    }

    /// Replace every occurrence, leaving surrounding characters untouched
    pub fn replace(&self, text: &str, replacement: &str) -> MatchResult<String> {
        let matches = self.find(text)?;
        if matches.is_empty() {
            return Ok(text.to_string());
        }
        let mut out = String::with_capacity(text.len() + matches.len() * replacement.len());
        let mut cursor = 0;
        for m in &matches {
            out.push_str(&text[cursor..m.start]);
            out.push_str(replacement);
            cursor = m.end;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |ch| at + ch.len_utf8())
}

fn prev_boundary(text: &str, at: usize) -> usize {
    text[..at]
        .chars()
        .next_back()
        .map_or(0, |ch| at - ch.len_utf8())
}
