//! # Configuration
//!
//! Bucketnotes configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `BUCKETNOTES__BIND`, `BUCKETNOTES__DATA_FILE`, etc.
//! 2. **Data Directory Config**: `<data dir>/bucketnotes.toml`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `bind` | `127.0.0.1:3000` | Address the HTTP server listens on |
//! | `data_file` | `data.json` | Name of the document inside the data directory |
//! | `static_dir` | unset | Directory of front-end assets served at `/` |
//! | `max_write_attempts` | `3` | Retries of a write that lost a revision race |
//!
//! ## CLI Usage
//!
//! - `bucketnotes config`: Show all configuration values.
//! - `bucketnotes config get <key>`: Get a specific value.
//! - `bucketnotes config set <key> <value>`: Set a value.
//! - `bucketnotes config gen`: Generate a sample `bucketnotes.toml`.

use crate::commands::{WriteOptions, DEFAULT_WRITE_ATTEMPTS};
use crate::store::fs_backend::DEFAULT_DATA_FILE;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "bucketnotes.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Configuration for bucketnotes, stored in `bucketnotes.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    /// Socket address for `bucketnotes serve`
    #[config(default = "127.0.0.1:3000")]
    pub bind: String,

    /// File name of the JSON document, relative to the data directory
    #[config(default = "data.json")]
    pub data_file: String,

    /// Directory with the browser client. Nothing is served at `/` when absent.
    pub static_dir: Option<PathBuf>,

    /// How many times a write is attempted when another writer got there first
    #[config(default = 3)]
    pub max_write_attempts: usize,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            data_file: DEFAULT_DATA_FILE.to_string(),
            static_dir: None,
            max_write_attempts: DEFAULT_WRITE_ATTEMPTS,
        }
    }
}

impl NotesConfig {
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            max_attempts: self.max_write_attempts.max(1),
        }
    }

    /// Data file name, falling back to the default when configured blank.
    pub fn data_file(&self) -> &str {
        let name = self.data_file.trim();
        if name.is_empty() {
            DEFAULT_DATA_FILE
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotesConfig::default();
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.data_file(), "data.json");
        assert!(config.static_dir.is_none());
        assert_eq!(config.write_options(), WriteOptions::default());
    }

    #[test]
    fn test_blank_data_file_falls_back() {
        let config = NotesConfig {
            data_file: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.data_file(), "data.json");
    }

    #[test]
    fn test_write_attempts_never_zero() {
        let config = NotesConfig {
            max_write_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.write_options().max_attempts, 1);
    }

    #[test]
    fn test_parses_toml_file() {
        let config: NotesConfig = toml::from_str(
            r#"
            bind = "0.0.0.0:8080"
            data_file = "notes.json"
            static_dir = "public"
            max_write_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.data_file(), "notes.json");
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.write_options().max_attempts, 5);
    }
}
