//! # Data Directory and Startup
//!
//! Bucketnotes keeps one document per data directory. [`initialize`] decides which
//! directory that is, loads the configuration that applies to it and opens the
//! store.
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit override (the CLI's `--data <dir>`).
//! 2. The `BUCKETNOTES_DATA` environment variable. Tests use it to isolate state.
//! 3. The OS-appropriate data directory from the `directories` crate.
//!
//! ## Configuration Search Paths
//!
//! `bucketnotes.toml` is looked up in the global config directory and then in the
//! data directory, merged so that the data directory wins. Environment variables
//! (`BUCKETNOTES__*`) override both. A broken or missing config file falls back to
//! defaults rather than refusing to start.

use crate::api::NotesApi;
use crate::config::{NotesConfig, CONFIG_FILE};
use crate::error::{NotesError, Result};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const APP_NAME: &str = "bucketnotes";
pub const DATA_ENV: &str = "BUCKETNOTES_DATA";

pub struct NotesContext {
    pub api: NotesApi<FileStore>,
    pub config: NotesConfig,
    pub data_dir: PathBuf,
    pub config_dir: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", APP_NAME, APP_NAME)
}

/// Picks the data directory: override, then environment, then OS default.
pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotesError::Store("could not determine a data directory".to_string()))
}

/// Global config directory, when the platform has one.
pub fn global_config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Search paths for `bucketnotes.toml`, lowest priority first.
pub fn config_search_paths(config_dir: Option<&Path>, data_dir: &Path) -> Vec<SearchPath> {
    let mut paths = Vec::new();
    if let Some(dir) = config_dir {
        paths.push(SearchPath::Path(dir.to_path_buf()));
    }
    paths.push(SearchPath::Path(data_dir.to_path_buf()));
    paths
}

pub fn load_config(config_dir: Option<&Path>, data_dir: &Path) -> NotesConfig {
    Clapfig::builder()
        .app_name(APP_NAME)
        .file_name(CONFIG_FILE)
        .search_paths(config_search_paths(config_dir, data_dir))
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Resolves the data directory, loads configuration and opens the store.
pub fn initialize(data_override: Option<PathBuf>) -> Result<NotesContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config_dir = global_config_dir();
    let config = load_config(config_dir.as_deref(), &data_dir);
    debug!(?config, "configuration loaded");

    Ok(open(data_dir, config_dir, config))
}

/// Opens the store for an already-resolved directory and configuration.
pub fn open(data_dir: PathBuf, config_dir: Option<PathBuf>, config: NotesConfig) -> NotesContext {
    let store = FileStore::with_file(data_dir.clone(), config.data_file());
    let api = NotesApi::with_options(store, config.write_options());
    info!(path = %api.location().display(), "using document");

    NotesContext {
        api,
        config,
        data_dir,
        config_dir,
    }
}
