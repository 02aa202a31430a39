//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all bucketnotes operations, regardless of the UI being used: the
//! HTTP server and the CLI both hold a [`NotesApi`].
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., restore by name or by id)
//! - **Carries write options** so every mutation retries the same way
//! - **Returns structured types**, never strings for a terminal
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O formatting**: No stdout, stderr, HTTP status codes
//!
//! ## Generic Over DataStore
//!
//! `NotesApi<S: DataStore>` is generic over the storage backend:
//! - Production: `NotesApi<FileStore>`
//! - Testing: `NotesApi<InMemoryStore>`
//!
//! Every method takes `&self`. Stores synchronise their own writes, so one api can
//! be shared behind an `Arc` by concurrent request handlers.

use crate::commands::{self, WriteOptions};
use crate::error::Result;
use crate::model::{Document, Note};
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

pub use commands::export::ExportFile;
pub use commands::notes::NoteCreated;
pub use commands::restore::RestoreTarget;
pub use commands::search::SearchHit;
pub use commands::stats::BucketCount;
pub use commands::summary::TestNumberSummary;

/// The main API facade for bucketnotes operations.
pub struct NotesApi<S: DataStore> {
    store: S,
    options: WriteOptions,
}

impl<S: DataStore> NotesApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, WriteOptions::default())
    }

    pub fn with_options(store: S, options: WriteOptions) -> Self {
        Self { store, options }
    }

    pub fn data(&self) -> Result<Document> {
        commands::get::run(&self.store)
    }

    pub fn create_bucket(&self, name: &str, keyword: &str) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, self.options, name, keyword)
    }

    pub fn delete_bucket(&self, name: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&self.store, self.options, name)
    }

    /// Restores by id when one is given, else by name.
    pub fn restore_bucket(
        &self,
        name: Option<&str>,
        id: Option<Uuid>,
    ) -> Result<commands::CmdResult> {
        let target = RestoreTarget::from_parts(name, id)?;
        commands::restore::run(&self.store, self.options, &target)
    }

    pub fn create_note(
        &self,
        test_number: &str,
        note_text: &str,
        bucket_name: &str,
    ) -> Result<NoteCreated> {
        commands::notes::run(&self.store, self.options, test_number, note_text, bucket_name)
    }

    pub fn bucket_counts(&self) -> Result<Vec<BucketCount>> {
        commands::stats::run(&self.store)
    }

    pub fn test_numbers(&self) -> Result<Vec<TestNumberSummary>> {
        commands::summary::run(&self.store)
    }

    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        commands::search::run(&self.store, query)
    }

    pub fn bucket_notes(&self, bucket_name: &str) -> Result<Vec<Note>> {
        commands::view::run(&self.store, bucket_name)
    }

    pub fn export_csv(&self) -> Result<ExportFile> {
        commands::export::csv(&self.store)
    }

    pub fn export_note(&self, test_number: &str, timestamp: DateTime<Utc>) -> Result<ExportFile> {
        commands::export::note(&self.store, test_number, timestamp)
    }

    pub fn export_archive(&self) -> Result<ExportFile> {
        commands::export::archive(&self.store)
    }

    /// Where the document lives, for display.
    pub fn location(&self) -> PathBuf {
        self.store.location()
    }

    pub fn options(&self) -> WriteOptions {
        self.options
    }
}
