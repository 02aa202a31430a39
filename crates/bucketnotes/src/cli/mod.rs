//! # CLI Behavior
//!
//! This is **one possible UI client** for bucketnotes, next to the HTTP server.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Output
//!
//! Every command prints styled text by default. `--output json` prints the
//! structured result instead (the document after a mutation, the rows of an
//! aggregate), which is what scripts should consume. Logs always go to stderr.
//!
//! ## Data Location
//!
//! `--data DIR` wins over `BUCKETNOTES_DATA`, which wins over the platform data
//! directory. The CLI and a running server can share one directory: writes are
//! checked against the stored revision, so a stale write fails instead of
//! overwriting.
//!
//! ## Module Structure
//!
//! - `commands`: Dispatch from parsed arguments to the api, plus `config` handling
//! - `render`: Output formatting (tables, bars, relative times)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logs to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "bucketnotes=debug,bucketnotesapp=debug,tower_http=debug"
    } else {
        "bucketnotes=info,bucketnotesapp=warn,tower_http=info"
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
