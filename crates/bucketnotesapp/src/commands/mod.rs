//! # Command Layer
//!
//! This module contains the **core business logic** of bucketnotes. Each command
//! lives in its own submodule and implements plain Rust functions over a
//! [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! - Mutating commands run one read-modify-write cycle: load the document, apply
//!   their steps in memory, persist once. A failed validation returns before
//!   anything is written, so storage is never left half-updated.
//! - Read commands derive views (counts, summaries, search, exports) from a
//!   fresh load; nothing they compute is persisted.
//! - Commands return structured values, never strings for a terminal.
//!
//! ## Lost Updates
//!
//! Writes go through [`helpers::mutate`], which retries the whole operation
//! from a fresh read when the store reports a revision conflict. The number of
//! attempts comes from [`WriteOptions`].
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests use
//! `InMemoryStore` and cover every branch and error of each command.
//!
//! ## Command Modules
//!
//! - [`create`]: Create a bucket
//! - [`delete`]: Delete a bucket, snapshotting its notes
//! - [`restore`]: Restore a deleted bucket
//! - [`notes`]: Create a note
//! - [`get`]: Read the whole document
//! - [`stats`]: Per-bucket note counts
//! - [`summary`]: Per-test-number summary
//! - [`search`]: Test-number search
//! - [`view`]: Notes of one bucket
//! - [`export`]: CSV, plain-text and archive exports
//! - [`helpers`]: Shared utilities (retrying writes)

use crate::model::Document;
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod helpers;
pub mod notes;
pub mod restore;
pub mod search;
pub mod stats;
pub mod summary;
pub mod view;

pub const DEFAULT_WRITE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// How many times a conflicting write is retried from a fresh read.
    pub max_attempts: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_WRITE_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Result of a mutating bucket command: the document as persisted.
#[derive(Debug, Clone)]
pub struct CmdResult {
    pub document: Document,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.add_message(message);
        self
    }
}
