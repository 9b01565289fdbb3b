//! Diff command implementation

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tikkun_core::{EngineConfig, FixClassifier, FixType, WordAligner, WordChange};

use super::classify::select_classifier;
use crate::error::{CliError, CliResult};
use crate::output::{formatter, OutputFormat};

/// Arguments for the diff command
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Text before the edit
    #[arg(short, long, value_name = "FILE")]
    pub before: PathBuf,

    /// Text after the edit
    #[arg(short, long, value_name = "FILE")]
    pub after: PathBuf,

    /// Use the heuristic classifier instead of the handler chain
    #[arg(long)]
    pub legacy: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub(crate) fn read_text(path: &Path) -> CliResult<String> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()).into());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Tag every change, falling back to `default` when the classifier fails
pub fn classify_changes(classifier: &dyn FixClassifier, changes: &mut [WordChange]) {
    for change in changes {
        let fix_type = classifier
            .fix_type(&change.original_word, &change.corrected_word)
            .unwrap_or_else(|e| {
                log::warn!("{e}; tagging '{}' as default", change.original_word);
                FixType::Default
            });
        change.fix_type = Some(fix_type);
    }
}

impl DiffArgs {
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        let before = read_text(&self.before)?;
        let after = read_text(&self.after)?;

        let mut changes = WordAligner::default().align(&before, &after);
        log::info!("{} change(s) between the two texts", changes.len());

        let classifier = select_classifier(config, self.legacy);
        classify_changes(classifier.as_ref(), &mut changes);
        formatter(self.format, out).changes(&changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tikkun_core::{ClassifyError, Classification};

    struct Failing;

    impl FixClassifier for Failing {
        fn classify(&self, _: &str, _: &str) -> Result<Classification, ClassifyError> {
            Err(ClassifyError::new("failing", "always"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_classify_changes_tags_all() {
        let mut changes = WordAligner::default().align("הילד אמר שלום", "הילד אמר שָׁלוֹם");
        classify_changes(select_classifier(&EngineConfig::hebrew(), false).as_ref(), &mut changes);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].fix_type, Some(FixType::Vowelization));
    }

    #[test]
    fn test_classifier_failure_falls_back() {
        let mut changes = vec![WordChange::new("א", "ב", 0)];
        classify_changes(&Failing, &mut changes);
        assert_eq!(changes[0].fix_type, Some(FixType::Default));
    }

    #[test]
    fn test_missing_input_file() {
        let args = DiffArgs {
            before: PathBuf::from("/no/such/before.txt"),
            after: PathBuf::from("/no/such/after.txt"),
            legacy: false,
            format: OutputFormat::Text,
        };
        let err = args.run(&EngineConfig::hebrew(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
