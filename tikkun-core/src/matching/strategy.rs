//! Matching strategy selection
//!
//! The lookaround strategy expresses both boundaries inside one pattern and
//! needs a regex engine with lookbehind. The capture-and-trim strategy
//! consumes the left boundary character, captures the word, and checks the
//! right boundary in code. Which one runs is decided once per process.

use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, warn};

use super::pattern::WordPattern;
use super::regime::BoundaryRules;
use crate::config::StrategyChoice;

/// Boundary matching implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Single pattern with lookbehind/lookahead (fancy-regex)
    Lookaround,
    /// Prefix capture with a code-side trailing check (regex)
    CaptureTrim,
}

impl MatchStrategy {
    /// Strategy for a configuration choice; `Auto` runs the capability probe
    pub fn resolve(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Auto => probe(),
            StrategyChoice::Lookaround => MatchStrategy::Lookaround,
            StrategyChoice::CaptureTrim => MatchStrategy::CaptureTrim,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MatchStrategy::Lookaround => "lookaround",
            MatchStrategy::CaptureTrim => "capture_trim",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static PROBED: OnceLock<MatchStrategy> = OnceLock::new();

/// Capability probe, evaluated at most once per process
pub fn probe() -> MatchStrategy {
    *PROBED.get_or_init(|| {
        if lookaround_supported() {
            debug!("boundary matcher using lookaround strategy");
            MatchStrategy::Lookaround
        } else {
            warn!("lookbehind unavailable, boundary matcher falling back to capture-and-trim");
            MatchStrategy::CaptureTrim
        }
    })
}

/// Compile the most demanding pattern shape and check it behaves
fn lookaround_supported() -> bool {
    let rules = BoundaryRules::new(vec!['ו'], vec!['-'], Vec::new());
    let pattern = match WordPattern::compile("ילד", &rules, MatchStrategy::Lookaround, true) {
        Ok(pattern) => pattern,
        Err(err) => {
            debug!("lookaround probe failed to compile: {err}");
            return false;
        }
    };
    match pattern.find("וילד ילד ילדים ב-ילד") {
        Ok(found) => {
            let spans: Vec<(usize, usize)> = found.iter().map(|m| (m.start, m.end)).collect();
            spans == [(2, 8), (9, 15)]
        }
        Err(err) => {
            debug!("lookaround probe failed to execute: {err}");
            false
        }
    }
}
