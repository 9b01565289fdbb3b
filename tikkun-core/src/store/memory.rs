//! In-memory reference store with snapshot transactions

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{BookStore, UnitOfWork};
use crate::error::{StoreError, StoreResult};
use crate::model::{CorrectionRecord, Paragraph, TtsSettings};

#[derive(Debug, Clone, Default)]
struct State {
    paragraphs: BTreeMap<String, Paragraph>,
    corrections: Vec<CorrectionRecord>,
    tts: HashMap<String, TtsSettings>,
}

impl State {
    fn validate(&self, record: &CorrectionRecord) -> StoreResult<()> {
        if record.original_word.trim().is_empty() {
            return Err(StoreError::Rejected("original word is empty".to_string()));
        }
        if !self.paragraphs.contains_key(&record.paragraph_id) {
            return Err(StoreError::Rejected(format!(
                "unknown paragraph '{}'",
                record.paragraph_id
            )));
        }
        Ok(())
    }
}

/// Store backed by process memory
///
/// A transaction works on a copy of the state and swaps it in on success.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with paragraphs
    pub fn with_paragraphs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        let store = Self::new();
        for paragraph in paragraphs {
            store.insert_paragraph(paragraph);
        }
        store
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Insert or overwrite a paragraph outside any transaction
    pub fn insert_paragraph(&self, paragraph: Paragraph) {
        if let Ok(mut state) = self.lock() {
            state.paragraphs.insert(paragraph.id.clone(), paragraph);
        }
    }

    /// Append existing correction records, e.g. when loading from disk
    pub fn extend_corrections(&self, records: impl IntoIterator<Item = CorrectionRecord>) {
        if let Ok(mut state) = self.lock() {
            state.corrections.extend(records);
        }
    }

    pub fn set_tts_settings(&self, book_id: &str, settings: TtsSettings) {
        if let Ok(mut state) = self.lock() {
            state.tts.insert(book_id.to_string(), settings);
        }
    }

    pub fn paragraph(&self, id: &str) -> Option<Paragraph> {
        self.lock().ok()?.paragraphs.get(id).cloned()
    }

    /// Every paragraph of every book in reading order
    pub fn all_paragraphs(&self) -> Vec<Paragraph> {
        let Ok(state) = self.lock() else {
            return Vec::new();
        };
        let mut all: Vec<Paragraph> = state.paragraphs.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.book_id.as_str(), a.reading_order()).cmp(&(b.book_id.as_str(), b.reading_order()))
        });
        all
    }

    /// Committed correction log, oldest first
    pub fn corrections(&self) -> Vec<CorrectionRecord> {
        self.lock()
            .map(|state| state.corrections.clone())
            .unwrap_or_default()
    }
}

impl BookStore for MemoryStore {
    fn get_book_paragraphs(
        &self,
        book_id: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<Vec<Paragraph>> {
        let state = self.lock()?;
        let mut paragraphs: Vec<Paragraph> = state
            .paragraphs
            .values()
            .filter(|p| p.book_id == book_id && Some(p.id.as_str()) != exclude_id)
            .cloned()
            .collect();
        paragraphs.sort_by_key(Paragraph::reading_order);
        Ok(paragraphs)
    }

    fn get_tts_settings(&self, book_id: &str) -> StoreResult<TtsSettings> {
        Ok(self.lock()?.tts.get(book_id).cloned().unwrap_or_default())
    }

    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.lock()?;
        let mut scratch = MemoryUnit {
            state: state.clone(),
        };
        let value = work(&mut scratch)?;
        *state = scratch.state;
        Ok(value)
    }
}

struct MemoryUnit {
    state: State,
}

impl UnitOfWork for MemoryUnit {
    fn get_paragraph(&mut self, id: &str) -> StoreResult<Option<Paragraph>> {
        Ok(self.state.paragraphs.get(id).cloned())
    }

    fn update_paragraph_content(&mut self, id: &str, content: &str) -> StoreResult<()> {
        match self.state.paragraphs.get_mut(id) {
            Some(paragraph) => {
                paragraph.content = content.to_string();
                Ok(())
            }
            None => Err(StoreError::Conflict(format!(
                "paragraph '{id}' vanished during the transaction"
            ))),
        }
    }

    fn create_correction(&mut self, record: CorrectionRecord) -> StoreResult<()> {
        self.state.validate(&record)?;
        self.state.corrections.push(record);
        Ok(())
    }

    fn create_many_corrections(&mut self, records: Vec<CorrectionRecord>) -> StoreResult<()> {
        for record in &records {
            self.state.validate(record)?;
        }
        self.state.corrections.extend(records);
        Ok(())
    }
}
