//! # Storage Layer
//!
//! The whole application state is one JSON [`Document`]. It is read in full and
//! written in full on every mutation; nothing is cached between operations.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: the "how". Raw reads and writes of the stored
//!   document (filesystem or memory).
//! - [`doc_store::DocStore`]: the "what". Defaults for missing storage,
//!   self-healing of the Uncategorized bucket and revision checking. It
//!   implements [`DataStore`], the port every command is written against.
//!
//! ## Revisions and Lost Updates
//!
//! Each stored document carries a `revision` counter next to its collections:
//!
//! ```text
//! data.json
//! {
//!   "revision": 7,
//!   "buckets": [...],
//!   "notes": [...],
//!   "deletedBuckets": [...]
//! }
//! ```
//!
//! [`DataStore::save`] is a compare-and-swap: it succeeds only if the stored
//! revision still equals the one the caller loaded, and then bumps it. A second
//! writer that raced the first gets [`NotesError::Conflict`] and re-runs its
//! operation against a fresh read instead of silently discarding the first
//! writer's changes. Documents written before revisions existed load as
//! revision 0.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `DocStore` over `<data_dir>/data.json`.
//! - [`memory::InMemoryStore`]: for testing command logic without I/O.
//!
//! [`NotesError::Conflict`]: crate::error::NotesError::Conflict

use crate::error::Result;
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod backend;
pub mod doc_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// A document together with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub document: Document,
    pub revision: u64,
}

/// On-disk shape: the document's collections flattened next to the revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(default)]
    pub revision: u64,
    #[serde(flatten)]
    pub document: Document,
}

/// Abstract interface for document persistence.
pub trait DataStore {
    /// Read the current document. Missing storage yields the default document.
    fn load(&self) -> Result<Snapshot>;

    /// Overwrite the stored document if it is still at `expected_revision`.
    /// Returns the new revision.
    fn save(&self, document: &Document, expected_revision: u64) -> Result<u64>;

    /// Where the document lives (a real path, or a virtual one for memory stores).
    fn location(&self) -> PathBuf;
}
