//! Storage contracts consumed by the propagator
//!
//! The engine owns no persisted state. It reads paragraphs through a
//! [`BookStore`] and performs every write through the [`UnitOfWork`] handed
//! to a [`BookStore::transaction`] closure, so one bulk apply commits or rolls
//! back as a whole.

mod memory;

pub use memory::MemoryStore;

use crate::error::{StoreError, StoreResult};
use crate::model::{CorrectionRecord, Paragraph, TtsSettings};

/// Reads and writes available inside one transaction
pub trait UnitOfWork {
    /// Current paragraph state; `None` when it no longer exists
    fn get_paragraph(&mut self, id: &str) -> StoreResult<Option<Paragraph>>;

    fn update_paragraph_content(&mut self, id: &str, content: &str) -> StoreResult<()>;

    fn create_correction(&mut self, record: CorrectionRecord) -> StoreResult<()>;

    /// Insert a batch; on error none of the batch is kept
    fn create_many_corrections(&mut self, records: Vec<CorrectionRecord>) -> StoreResult<()>;
}

/// Paragraph store, correction log and book metadata
pub trait BookStore: Send + Sync {
    /// Paragraphs of a book in reading order, optionally skipping one
    fn get_book_paragraphs(
        &self,
        book_id: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<Vec<Paragraph>>;

    /// TTS settings recorded with each correction; missing values stay `None`
    fn get_tts_settings(&self, book_id: &str) -> StoreResult<TtsSettings>;

    /// Run `work` atomically: commit when it returns `Ok`, discard otherwise
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>;
}
