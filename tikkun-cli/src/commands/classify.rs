//! Classify command implementation

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tikkun_core::{build_classifier, EngineConfig, FixClassifier, HeuristicClassifier};

use crate::error::CliResult;
use crate::output::{formatter, OutputFormat};

/// Arguments for the classify command
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Word as it appeared before the correction
    pub original: String,

    /// Word after the correction
    pub corrected: String,

    /// Use the heuristic classifier instead of the handler chain
    #[arg(long)]
    pub legacy: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Classifier honoring a `--legacy` override
pub(crate) fn select_classifier(config: &EngineConfig, legacy: bool) -> Arc<dyn FixClassifier> {
    if legacy {
        Arc::new(HeuristicClassifier::new())
    } else {
        build_classifier(config)
    }
}

impl ClassifyArgs {
    pub fn run<W: Write>(&self, config: &EngineConfig, out: &mut W) -> CliResult<()> {
        let classifier = select_classifier(config, self.legacy);
        log::debug!("classifying with the {} classifier", classifier.name());
        let classification = classifier
            .classify(&self.original, &self.corrected)
            .with_context(|| format!("Failed to classify '{}'", self.original))?;
        formatter(self.format, out).classification(
            &self.original,
            &self.corrected,
            &classification,
        )
    }
}
