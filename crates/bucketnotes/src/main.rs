//! # Bucketnotes
//!
//! Bucketnotes records free-text notes against test numbers and files them in
//! named buckets. This binary is intentionally thin: the CLI lives in `src/cli/`,
//! the HTTP server in `src/server.rs`, and this file only invokes `cli::run()`
//! and handles process termination.
//!
//! ## Workspace Structure
//!
//! Bucketnotes is organized as a Cargo workspace with two crates:
//! - `crates/bucketnotesapp/`: Core library with UI-agnostic business logic
//! - `crates/bucketnotes/`: This binary, depends on the `bucketnotesapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────┐  ┌──────────────────────────────────┐
//! │  CLI (src/cli/)                  │  │  HTTP server (src/server.rs)     │
//! │  - clap parsing (setup.rs)       │  │  - axum routes under /api        │
//! │  - dispatch (commands.rs)        │  │  - JSON errors with HTTP status  │
//! │  - terminal output (render.rs)   │  │  - optional static front end     │
//! └──────────────────────────────────┘  └──────────────────────────────────┘
//!                  │                                     │
//!                  └──────────────────┬──────────────────┘
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/bucketnotesapp/src/api.rs)                           │
//! │  - One method per operation, returns structured values                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/bucketnotesapp/src/commands/*)                   │
//! │  - Pure business logic over the document, no terminal or HTTP           │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store (crates/bucketnotesapp/src/store/*)                              │
//! │  - One JSON document, written atomically with a revision check          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both front ends map library errors the same way: the CLI prints `Error: ...`
//! and exits 1, the server answers with the error's HTTP status.
//!
//! ## Testing Approach
//!
//! - **Commands layer**: unit tests against the in-memory store.
//! - **Store layer**: filesystem tests in temporary directories.
//! - **Server**: router tests driven with `tower::ServiceExt::oneshot`.
//! - **CLI**: rendering unit tests plus end-to-end runs of the binary in `tests/`.

mod cli;
mod server;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
