use super::backend::StorageBackend;
use super::{DataStore, Snapshot};
use crate::error::{NotesError, Result};
use crate::model::Document;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

pub struct DocStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    /// Serialises the read-check-write of `save` within this process.
    write_lock: Mutex<()>,
}

impl<B: StorageBackend> DocStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn stored_revision(&self) -> Result<u64> {
        Ok(self
            .backend
            .read_document()?
            .map(|stored| stored.revision)
            .unwrap_or(0))
    }
}

impl<B: StorageBackend> DataStore for DocStore<B> {
    fn load(&self) -> Result<Snapshot> {
        let Some(stored) = self.backend.read_document()? else {
            debug!(path = %self.backend.document_path().display(), "no stored document, using defaults");
            return Ok(Snapshot {
                document: Document::default(),
                revision: 0,
            });
        };

        let mut document = stored.document;
        // Healed in memory only; the next save persists it.
        if document.ensure_uncategorized() {
            warn!("stored document was missing the Uncategorized bucket, re-inserted it");
        }
        let assigned = document.assign_missing_ids();
        if assigned > 0 {
            debug!(assigned, "derived ids for buckets stored without one");
        }

        Ok(Snapshot {
            document,
            revision: stored.revision,
        })
    }

    fn save(&self, document: &Document, expected_revision: u64) -> Result<u64> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| NotesError::Store("store write lock poisoned".to_string()))?;

        let found = self.stored_revision()?;
        if found != expected_revision {
            debug!(expected = expected_revision, found, "revision mismatch, rejecting save");
            return Err(NotesError::Conflict {
                expected: expected_revision,
                found,
            });
        }

        let revision = found + 1;
        self.backend.write_document(revision, document)?;
        debug!(revision, "document saved");
        Ok(revision)
    }

    fn location(&self) -> PathBuf {
        self.backend.document_path()
    }
}
