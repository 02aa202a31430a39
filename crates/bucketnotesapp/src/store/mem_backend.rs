use super::backend::StorageBackend;
use super::StoredDocument;
use crate::error::{NotesError, Result};
use crate::model::Document;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` rather than `RefCell` so stores built on it can be shared
/// with the HTTP server, which requires `Send + Sync` state.
#[derive(Default)]
pub struct MemBackend {
    stored: Mutex<Option<StoredDocument>>,
    simulate_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-persisted document.
    pub fn with_document(document: Document, revision: u64) -> Self {
        Self {
            stored: Mutex::new(Some(StoredDocument { revision, document })),
            simulate_write_error: AtomicBool::new(false),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<StoredDocument>>> {
        self.stored
            .lock()
            .map_err(|_| NotesError::Store("memory backend lock poisoned".to_string()))
    }
}

impl StorageBackend for MemBackend {
    fn read_document(&self) -> Result<Option<StoredDocument>> {
        Ok(self.slot()?.clone())
    }

    fn write_document(&self, revision: u64, document: &Document) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(NotesError::Store("Simulated write error".to_string()));
        }
        *self.slot()? = Some(StoredDocument {
            revision,
            document: document.clone(),
        });
        Ok(())
    }

    fn document_path(&self) -> PathBuf {
        PathBuf::from("memory://data.json")
    }
}
