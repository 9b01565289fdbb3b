//! JSON book files
//!
//! A book file holds one book's metadata, its paragraphs and the correction
//! log. It is loaded into a [`MemoryStore`] for the engine and written back
//! through a temporary file so a failed write never truncates the original.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tikkun_core::{CorrectionRecord, MemoryStore, Paragraph, TtsSettings};

use crate::error::{CliError, CliResult};

/// Book metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMeta {
    pub id: String,
    #[serde(default, alias = "tts_model", skip_serializing_if = "Option::is_none")]
    pub tts_model: Option<String>,
    #[serde(default, alias = "tts_voice", skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,
}

/// Paragraph entry; the book id comes from the enclosing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookParagraph {
    pub id: String,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub order_index: u32,
    pub content: String,
}

/// On-disk layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookFile {
    pub book: BookMeta,
    #[serde(default)]
    pub paragraphs: Vec<BookParagraph>,
    #[serde(default)]
    pub corrections: Vec<CorrectionRecord>,
}

impl BookFile {
    /// Parse and check a book file body
    pub fn from_json(json: &str) -> CliResult<Self> {
        let file: BookFile =
            serde_json::from_str(json).map_err(|e| CliError::InvalidBook(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> CliResult<()> {
        if self.book.id.trim().is_empty() {
            return Err(CliError::InvalidBook("book id is empty".to_string()).into());
        }
        let mut seen = HashSet::new();
        for paragraph in &self.paragraphs {
            if !seen.insert(paragraph.id.as_str()) {
                return Err(CliError::InvalidBook(format!(
                    "duplicate paragraph id '{}'",
                    paragraph.id
                ))
                .into());
            }
        }
        Ok(())
    }

    fn tts_settings(&self) -> TtsSettings {
        TtsSettings {
            model: self.book.tts_model.clone(),
            voice: self.book.tts_voice.clone(),
        }
    }

    fn to_paragraph(&self, entry: &BookParagraph) -> Paragraph {
        Paragraph {
            id: entry.id.clone(),
            book_id: self.book.id.clone(),
            page_number: entry.page_number,
            order_index: entry.order_index,
            content: entry.content.clone(),
        }
    }
}

/// A book file opened against an in-memory store
#[derive(Debug)]
pub struct Book {
    path: PathBuf,
    file: BookFile,
    store: Arc<MemoryStore>,
}

impl Book {
    /// Load `path` and seed a store with its contents
    pub fn open(path: impl AsRef<Path>) -> CliResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read book file {}", path.display()))?;
        let file = BookFile::from_json(&json)?;

        let store = MemoryStore::with_paragraphs(
            file.paragraphs.iter().map(|entry| file.to_paragraph(entry)),
        );
        store.extend_corrections(file.corrections.iter().cloned());
        store.set_tts_settings(&file.book.id, file.tts_settings());

        log::debug!(
            "loaded book {} with {} paragraph(s) and {} correction(s)",
            file.book.id,
            file.paragraphs.len(),
            file.corrections.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            store: Arc::new(store),
        })
    }

    pub fn id(&self) -> &str {
        &self.file.book.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store the engine runs against
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    pub fn has_paragraph(&self, id: &str) -> bool {
        self.file.paragraphs.iter().any(|p| p.id == id)
    }

    /// Copy the store's committed state back into the file, keeping its paragraph order
    pub fn sync(&mut self) {
        for entry in &mut self.file.paragraphs {
            if let Some(paragraph) = self.store.paragraph(&entry.id) {
                entry.content = paragraph.content;
            }
        }
        self.file.corrections = self.store.corrections();
    }

    /// Sync and atomically replace the file on disk
    pub fn save(&mut self) -> CliResult<()> {
        self.sync();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, &self.file)?;
        writeln!(tmp)?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write book file {}", self.path.display()))?;
        log::info!("wrote {}", self.path.display());
        Ok(())
    }

    pub fn file(&self) -> &BookFile {
        &self.file
    }
}
