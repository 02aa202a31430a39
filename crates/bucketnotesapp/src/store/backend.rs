use super::StoredDocument;
use crate::error::Result;
use crate::model::Document;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while DocStore handles the "what" (defaults, healing, revisions).
pub trait StorageBackend {
    /// Read the stored document.
    /// Returns Ok(None) if nothing has been written yet.
    /// Returns Err only on actual I/O or parse errors.
    fn read_document(&self) -> Result<Option<StoredDocument>>;

    /// Replace the stored document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_document(&self, revision: u64, document: &Document) -> Result<()>;

    /// Path of the stored document. For MemBackend, a virtual path.
    fn document_path(&self) -> PathBuf;
}
