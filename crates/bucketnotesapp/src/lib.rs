//! # bucketnotesapp
//!
//! Library behind the `bucketnotes` tool: notes recorded against test numbers,
//! grouped into named buckets, persisted as one JSON document.
//!
//! ## Layers
//!
//! ```text
//! UI clients (HTTP server, CLI)
//!         │
//!   api::NotesApi          thin facade, one method per operation
//!         │
//!   commands::*            business logic, one module per operation
//!         │
//!   store::DataStore       load / compare-and-swap save of the Document
//!         │
//!   store::StorageBackend  filesystem or memory
//! ```
//!
//! Nothing in this crate prints, parses arguments or speaks HTTP. Those concerns
//! live in the binary crate.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod store;

#[cfg(test)]
mod test_utils;
