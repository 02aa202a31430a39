//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data directory, load configuration, open the api
//! 3. **Dispatch**: Route each command to one api call
//! 4. **Output Formatting**: Text through `render`, or the raw result as JSON
//! 5. **Error Handling**: Errors bubble up to `main`, which prints them and exits 1

use super::render;
use super::setup::{
    BucketCommands, Cli, Commands, ConfigCommands, ExportCommands, NoteCommands, OutputMode,
};
use anyhow::{Context, Result};
use bucketnotesapp::api::{ExportFile, NotesApi};
use bucketnotesapp::config::{NotesConfig, CONFIG_FILE};
use bucketnotesapp::init::{config_search_paths, initialize, APP_NAME};
use bucketnotesapp::store::fs::FileStore;
use chrono::{DateTime, Utc};
use clap::Parser;
use clapfig::{Clapfig, ConfigAction, SearchPath};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    super::init_tracing(cli.verbose);

    let ctx = initialize(cli.data.clone())?;
    let out = Output { mode: cli.output };

    match cli.command {
        Commands::Serve { bind, static_dir } => {
            let mut config = ctx.config;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }
            serve(ctx.api, config)
        }
        Commands::Data => {
            let doc = ctx.api.data()?;
            let location = ctx.api.location().display().to_string();
            out.emit(&doc, || render::render_document(&doc, &location))
        }
        Commands::Bucket { action } => handle_bucket(&ctx.api, action, &out),
        Commands::Note { action } => handle_note(&ctx.api, action, &out),
        Commands::Tests => {
            let rows = ctx.api.test_numbers()?;
            out.emit(&rows, || render::render_test_numbers(&rows))
        }
        Commands::Search { query } => {
            let hits = ctx.api.search(&query)?;
            out.emit(&hits, || render::render_search(&hits))
        }
        Commands::Stats => {
            let counts = ctx.api.bucket_counts()?;
            out.emit(&counts, || render::render_stats(&counts))
        }
        Commands::Export { action } => handle_export(&ctx.api, action, &out),
        Commands::Config { action } => {
            handle_config_command(action, ctx.config_dir.as_deref(), &ctx.data_dir, &ctx.config)
        }
    }
}

/// Prints either the rendered text or the value as JSON.
struct Output {
    mode: OutputMode,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        match self.mode {
            OutputMode::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputMode::Text => print!("{}", text()),
        }
        Ok(())
    }
}

fn serve(api: NotesApi<FileStore>, config: NotesConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(crate::server::serve(api, &config))
}

fn handle_bucket(api: &NotesApi<FileStore>, action: BucketCommands, out: &Output) -> Result<()> {
    match action {
        BucketCommands::Add { name, keyword } => {
            let result = api.create_bucket(&name, &keyword)?;
            out.emit(&result.document, || render::render_messages(&result.messages))
        }
        BucketCommands::Rm { name } => {
            let result = api.delete_bucket(&name)?;
            out.emit(&result.document, || render::render_messages(&result.messages))
        }
        BucketCommands::Restore { name, id } => {
            let result = api.restore_bucket(name.as_deref(), id)?;
            out.emit(&result.document, || render::render_messages(&result.messages))
        }
        BucketCommands::List { deleted } => {
            let doc = api.data()?;
            if deleted {
                out.emit(&doc.deleted_buckets, || {
                    render::render_deleted_buckets(&doc.deleted_buckets)
                })
            } else {
                let counts = api.bucket_counts()?;
                out.emit(&counts, || render::render_bucket_list(&doc))
            }
        }
        BucketCommands::Show { name } => {
            let notes = api.bucket_notes(&name)?;
            out.emit(&notes, || render::render_notes(&notes))
        }
    }
}

fn handle_note(api: &NotesApi<FileStore>, action: NoteCommands, out: &Output) -> Result<()> {
    match action {
        NoteCommands::Add {
            test_number,
            text,
            bucket,
        } => {
            let created = api.create_note(&test_number, &text.join(" "), &bucket)?;
            out.emit(&created, || render::render_messages(&created.messages))
        }
    }
}

fn handle_export(api: &NotesApi<FileStore>, action: ExportCommands, out: &Output) -> Result<()> {
    let (file, dir) = match action {
        ExportCommands::Csv { dir } => (api.export_csv()?, dir),
        ExportCommands::Note {
            test_number,
            timestamp,
            dir,
        } => {
            let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
                .with_context(|| format!("invalid timestamp '{}'", timestamp))?
                .with_timezone(&Utc);
            (api.export_note(&test_number, timestamp)?, dir)
        }
        ExportCommands::Archive { dir } => (api.export_archive()?, dir),
    };

    let path = write_export(&file, dir.as_deref())?;

    #[derive(Serialize)]
    struct Exported {
        path: PathBuf,
        bytes: usize,
    }
    let exported = Exported {
        path: path.clone(),
        bytes: file.content.len(),
    };
    out.emit(&exported, || format!("Exported to {}\n", path.display()))
}

fn write_export(file: &ExportFile, dir: Option<&Path>) -> Result<PathBuf> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(&file.file_name);
    std::fs::write(&path, &file.content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Handle the `bucketnotes config` subcommand using clapfig directly.
fn handle_config_command(
    action: Option<ConfigCommands>,
    config_dir: Option<&Path>,
    data_dir: &Path,
    config: &NotesConfig,
) -> Result<()> {
    let load_paths = config_search_paths(config_dir, data_dir);
    let action = match action {
        None => {
            // Bare `bucketnotes config`: show all resolved values
            let table = toml::Value::try_from(config)?;
            if let toml::Value::Table(t) = table {
                for (k, v) in &t {
                    println!("{} = {}", k, format_toml_value(v));
                }
            }
            return Ok(());
        }
        Some(ConfigCommands::Gen { file }) => ConfigAction::Gen { output: file },
        Some(ConfigCommands::Get { key }) => ConfigAction::Get { key, scope: None },
        Some(ConfigCommands::Set { key, value }) => {
            // Writes go to the data directory's file, so it must be the only path
            let set_paths = vec![SearchPath::Path(data_dir.to_path_buf())];
            let result = Clapfig::builder::<NotesConfig>()
                .app_name(APP_NAME)
                .file_name(CONFIG_FILE)
                .search_paths(set_paths)
                .no_env()
                .strict(false)
                .handle(&ConfigAction::Set { key, value, scope: None })
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            println!("{result}");
            return Ok(());
        }
    };

    let result = Clapfig::builder::<NotesConfig>()
        .app_name(APP_NAME)
        .file_name(CONFIG_FILE)
        .search_paths(load_paths)
        .no_env()
        .strict(false)
        .handle(&action)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    match action {
        // Generated templates already end with a newline
        ConfigAction::Gen { .. } => print!("{result}"),
        _ => println!("{result}"),
    }
    Ok(())
}

/// Format a TOML value for display.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("\"{}\"", s),
        toml::Value::Array(a) => toml::to_string(a).unwrap_or_else(|_| format!("{a:?}")),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn export_lands_in_requested_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        let file = ExportFile {
            file_name: "T1.txt".to_string(),
            content: b"hello".to_vec(),
        };
        let path = write_export(&file, Some(&target)).unwrap();
        assert_eq!(path, target.join("T1.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn toml_values_are_quoted_like_the_file() {
        assert_eq!(
            format_toml_value(&toml::Value::String("127.0.0.1:3000".into())),
            "\"127.0.0.1:3000\""
        );
        assert_eq!(format_toml_value(&toml::Value::Integer(3)), "3");
    }
}
