//! Configuration structures and validation
//!
//! This module defines the TOML schema for engine configuration.

use serde::{Deserialize, Serialize};

use crate::text::script;

/// Root engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub metadata: Metadata,
    pub hebrew: HebrewRules,
    pub boundaries: Boundaries,
    pub sentences: Sentences,
    #[serde(default)]
    pub dialogue: Dialogue,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Hebrew prefix rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HebrewRules {
    /// One-letter prefixes that may precede a match without being part of it
    pub prefixes: Vec<char>,
    /// Whether bulk propagation accepts prefixed occurrences
    #[serde(default)]
    pub allow_prefix: bool,
}

/// Word boundary characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundaries {
    pub hyphens: Vec<char>,
    pub decimal_separators: Vec<char>,
}

/// Sentence segmentation for previews and correction context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentences {
    pub terminators: Vec<char>,
    /// Radius in characters of the fallback preview window
    #[serde(default = "default_preview_window")]
    pub preview_window: usize,
}

/// Characters that mark dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialogue {
    pub marks: Vec<char>,
}

impl Default for Dialogue {
    fn default() -> Self {
        Self {
            marks: vec!['"', '״', '“', '”', '„', '«', '»', '–', '—'],
        }
    }
}

/// Which classifier implementation to construct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Pluggable handler chain
    #[default]
    Handlers,
    /// Early heuristic-only classifier
    Legacy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default)]
    pub kind: ClassifierKind,
}

/// Boundary matching strategy selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyChoice {
    /// Probe the regex engine once and pick the best supported strategy
    #[default]
    Auto,
    /// Always use lookaround patterns
    Lookaround,
    /// Always use prefix-capture-and-trim patterns
    CaptureTrim,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub strategy: StrategyChoice,
}

fn default_preview_window() -> usize {
    50
}

impl EngineConfig {
    /// Validate configuration
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.sentences.terminators.is_empty() {
            return Err("No sentence terminators defined".to_string());
        }

        if self.sentences.preview_window == 0 {
            return Err("preview_window must be greater than 0".to_string());
        }

        if let Some(bad) = self
            .hebrew
            .prefixes
            .iter()
            .find(|&&ch| !script::is_hebrew_letter(ch))
        {
            return Err(format!("Prefix '{bad}' is not a Hebrew letter"));
        }

        if let Some(bad) = self
            .boundaries
            .hyphens
            .iter()
            .chain(&self.boundaries.decimal_separators)
            .find(|ch| ch.is_alphanumeric())
        {
            return Err(format!("Boundary character '{bad}' must not be alphanumeric"));
        }

        Ok(())
    }
}
