//! Word-level correction engine for digitized book text
//!
//! An editor corrects a paragraph; the engine works out exactly which words
//! changed, tags each change with a linguistic category, and offers to apply
//! the same correction everywhere else in the book.
//!
//! # Architecture
//!
//! - **text**: tokenization, word alignment, script helpers, sentence spans
//! - **matching**: script-aware whole-word find and replace
//! - **classify**: fix-type classifiers behind one strategy trait
//! - **propagate**: scanning, previews and transactional bulk apply
//! - **store**: the storage contracts the engine runs against
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tikkun_core::{align, CorrectionPropagator, EngineConfig, MemoryStore, Paragraph};
//!
//! let paragraph = |id: &str, order: u32, content: &str| Paragraph {
//!     id: id.into(),
//!     book_id: "book".into(),
//!     page_number: 1,
//!     order_index: order,
//!     content: content.into(),
//! };
//! let store = Arc::new(MemoryStore::with_paragraphs([
//!     paragraph("p1", 0, "הילד שיחק בחוץ."),
//!     paragraph("p2", 1, "שלום לכולם, אמר הילד."),
//! ]));
//! let propagator = CorrectionPropagator::new(store.clone(), &EngineConfig::hebrew());
//!
//! let changes = align("שלום לכולם", "שָׁלוֹם לכולם");
//! assert_eq!(changes.len(), 1);
//!
//! let mut session = propagator.session();
//! let suggestions = session.scan("book", Some("p1"), &changes).unwrap();
//! assert_eq!(suggestions[0].paragraphs[0].id, "p2");
//!
//! let report = session.apply_all().unwrap();
//! assert_eq!(report.updated_paragraphs, vec!["p2"]);
//! assert_eq!(store.paragraph("p2").unwrap().content, "שָׁלוֹם לכולם, אמר הילד.");
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod propagate;
pub mod store;
pub mod text;

pub use classify::{
    build_classifier, classify, Classification, FixClassifier, FixType, HandlerClassifier,
    HeuristicClassifier,
};
pub use config::EngineConfig;
pub use error::{ClassifyError, ConfigError, MatchError, PropagationError, StoreError};
pub use matching::{BoundaryMatcher, MatchStrategy, WordMatch};
pub use model::{
    aggregation_key, BulkFixSuggestion, ConfirmedFix, CorrectionRecord, Paragraph,
    ParagraphPreview, TtsSettings, WordChange,
};
pub use propagate::{ApplyReport, BulkFixSession, CorrectionPropagator, SessionState};
pub use store::{BookStore, MemoryStore, UnitOfWork};
pub use text::{align, tokenize, SentenceLocator, Token, WordAligner};
