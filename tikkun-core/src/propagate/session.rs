//! Scan/apply state machine

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::{ApplyReport, CorrectionPropagator};
use crate::error::{PropagationError, Result};
use crate::model::{BulkFixSuggestion, ConfirmedFix, WordChange};
use crate::store::BookStore;

/// Phase of a bulk-fix session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Scanning,
    PreviewReady,
    Applying,
    Committed,
    Failed,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Scanning => "scanning",
            SessionState::PreviewReady => "preview_ready",
            SessionState::Applying => "applying",
            SessionState::Committed => "committed",
            SessionState::Failed => "failed",
        }
    }

    /// Committed and Failed sessions accept no further steps
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Committed | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scan, review and apply cycle over a single book
///
/// `Idle -> Scanning -> PreviewReady -> Applying -> Committed | Failed`.
/// A scan may be repeated while previews are ready; applying requires them.
#[derive(Debug)]
pub struct BulkFixSession<'p, S> {
    propagator: &'p CorrectionPropagator<S>,
    state: SessionState,
    book_id: Option<String>,
    suggestions: Vec<BulkFixSuggestion>,
}

impl<'p, S: BookStore> BulkFixSession<'p, S> {
    pub(crate) fn new(propagator: &'p CorrectionPropagator<S>) -> Self {
        Self {
            propagator,
            state: SessionState::Idle,
            book_id: None,
            suggestions: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn suggestions(&self) -> &[BulkFixSuggestion] {
        &self.suggestions
    }

    fn require(&self, action: &'static str, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PropagationError::InvalidState {
                action,
                state: self.state.name(),
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        info!("bulk fix session {} -> {}", self.state, next);
        self.state = next;
    }

    /// Scan the book and keep the resulting previews for review
    pub fn scan(
        &mut self,
        book_id: &str,
        exclude_id: Option<&str>,
        changes: &[WordChange],
    ) -> Result<&[BulkFixSuggestion]> {
        self.require("scan", &[SessionState::Idle, SessionState::PreviewReady])?;
        self.transition(SessionState::Scanning);
        match self.propagator.scan(book_id, exclude_id, changes) {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.book_id = Some(book_id.to_string());
                self.transition(SessionState::PreviewReady);
                Ok(&self.suggestions)
            }
            Err(err) => {
                self.transition(SessionState::Failed);
                Err(err)
            }
        }
    }

    /// Apply the reviewer's confirmed subset of the previews
    pub fn apply(&mut self, fixes: &[ConfirmedFix]) -> Result<ApplyReport> {
        self.require("apply", &[SessionState::PreviewReady])?;
        let book_id = self.book_id.clone().unwrap_or_default();
        self.transition(SessionState::Applying);
        match self.propagator.apply_bulk_fixes(&book_id, fixes) {
            Ok(report) => {
                self.transition(SessionState::Committed);
                Ok(report)
            }
            Err(err) => {
                self.transition(SessionState::Failed);
                Err(err)
            }
        }
    }

    /// Confirm every suggestion for every previewed paragraph
    pub fn apply_all(&mut self) -> Result<ApplyReport> {
        let fixes: Vec<ConfirmedFix> = self.suggestions.iter().map(ConfirmedFix::from).collect();
        self.apply(&fixes)
    }
}
