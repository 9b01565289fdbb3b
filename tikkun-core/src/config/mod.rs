//! Engine configuration
//!
//! The default Hebrew configuration is embedded at compile time and parsed
//! once. Custom configurations load from TOML strings or files and go
//! through the same validation.

mod types;

pub use types::{
    Boundaries, ClassifierKind, ClassifierSettings, Dialogue, EngineConfig, HebrewRules,
    MatchingSettings, Metadata, Sentences, StrategyChoice,
};

use crate::error::ConfigError;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static EMBEDDED_HEBREW: OnceLock<Arc<EngineConfig>> = OnceLock::new();

const HEBREW_TOML: &str = include_str!("../../configs/scripts/hebrew.toml");

impl EngineConfig {
    /// Embedded default configuration for Hebrew book text
    pub fn hebrew() -> Arc<EngineConfig> {
        EMBEDDED_HEBREW
            .get_or_init(|| {
                let config = Self::parse(HEBREW_TOML, "embedded")
                    .expect("embedded hebrew.toml must be valid");
                Arc::new(config)
            })
            .clone()
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "inline")
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::hebrew().as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_hebrew_config() {
        let config = EngineConfig::hebrew();
        assert_eq!(config.metadata.code, "he");
        assert_eq!(config.hebrew.prefixes.len(), 7);
        assert!(!config.hebrew.allow_prefix);
        assert!(config.boundaries.hyphens.contains(&'־'));
        assert!(config.sentences.terminators.contains(&'׃'));
        assert_eq!(config.sentences.preview_window, 50);
        assert_eq!(config.classifier.kind, ClassifierKind::Handlers);
        assert_eq!(config.matching.strategy, StrategyChoice::Auto);
    }

    #[test]
    fn test_embedded_config_is_shared() {
        let a = EngineConfig::hebrew();
        let b = EngineConfig::hebrew();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_custom_prefix_list() {
        let toml = r#"
            [metadata]
            code = "he-min"
            name = "Hebrew (two prefixes)"

            [hebrew]
            prefixes = ["ו", "ה"]
            allow_prefix = true

            [boundaries]
            hyphens = ["-"]
            decimal_separators = ["."]

            [sentences]
            terminators = ["."]
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.hebrew.prefixes, vec!['ו', 'ה']);
        assert!(config.hebrew.allow_prefix);
        assert_eq!(config.sentences.preview_window, 50);
        assert_eq!(config.classifier.kind, ClassifierKind::Handlers);
    }

    #[test]
    fn test_rejects_non_hebrew_prefix() {
        let toml = HEBREW_TOML.replace(r#""ו", "ב""#, r#""w", "ב""#);
        match EngineConfig::from_toml_str(&toml) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("'w'")),
            other => panic!("Expected Invalid error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_terminators() {
        let toml = HEBREW_TOML.replace(
            r#"terminators = [".", "!", "?", "׃", "։", "…"]"#,
            "terminators = []",
        );
        assert!(matches!(
            EngineConfig::from_toml_str(&toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error_names_origin() {
        match EngineConfig::from_toml_str("[metadata\ncode=") {
            Err(ConfigError::Parse { origin, .. }) => assert_eq!(origin, "inline"),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEBREW_TOML.as_bytes()).unwrap();
        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.metadata.name, "Hebrew");
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            EngineConfig::from_file("/nonexistent/tikkun.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
