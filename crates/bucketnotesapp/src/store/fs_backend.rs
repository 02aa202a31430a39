use super::backend::StorageBackend;
use super::StoredDocument;
use crate::error::{NotesError, Result};
use crate::model::Document;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_DATA_FILE: &str = "data.json";

pub struct FsBackend {
    root: PathBuf,
    file_name: String,
}

/// Borrowing twin of [`StoredDocument`] so saves don't clone the document.
#[derive(Serialize)]
struct StoredRef<'a> {
    revision: u64,
    #[serde(flatten)]
    document: &'a Document,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_name: DEFAULT_DATA_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(NotesError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_document(&self) -> Result<Option<StoredDocument>> {
        let data_file = self.document_path();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&data_file).map_err(NotesError::Io)?;
        let stored: StoredDocument =
            serde_json::from_str(&content).map_err(NotesError::Serialization)?;
        Ok(Some(stored))
    }

    fn write_document(&self, revision: u64, document: &Document) -> Result<()> {
        self.ensure_dir(&self.root)?;

        let data_file = self.document_path();
        let content = serde_json::to_string_pretty(&StoredRef { revision, document })
            .map_err(NotesError::Serialization)?;

        // Atomic write; the temp file never outlives a failed attempt
        let tmp_file = self.root.join(format!(".data-{}.tmp", Uuid::new_v4()));
        let written = fs::write(&tmp_file, content).and_then(|_| fs::rename(&tmp_file, &data_file));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(NotesError::Io(e));
        }

        Ok(())
    }

    fn document_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }
}
