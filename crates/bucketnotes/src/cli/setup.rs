use bucketnotesapp::model::UNCATEGORIZED;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

/// How command results are printed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Styled text for a terminal
    #[default]
    Text,
    /// The structured result as pretty JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "bucketnotes",
    bin_name = "bucketnotes",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Notes on test numbers, grouped into buckets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding the document (overrides BUCKETNOTES_DATA)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputMode::Text,
        help_heading = "Options"
    )]
    pub output: OutputMode,

    /// Verbose logging
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP JSON server
    #[command(display_order = 1)]
    Serve {
        /// Address to listen on (defaults to the configured `bind`)
        #[arg(long)]
        bind: Option<String>,

        /// Directory of front-end assets served at `/`
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Print the whole document
    #[command(display_order = 2)]
    Data,

    /// Manage buckets
    #[command(display_order = 3)]
    Bucket {
        #[command(subcommand)]
        action: BucketCommands,
    },

    /// Manage notes
    #[command(display_order = 4)]
    Note {
        #[command(subcommand)]
        action: NoteCommands,
    },

    /// Summary of every test number, duplicates flagged
    #[command(alias = "t", display_order = 5)]
    Tests,

    /// Search notes by test number
    #[command(display_order = 6)]
    Search {
        /// Substring to look for, ignoring case
        #[arg(default_value = "")]
        query: String,
    },

    /// Note count per bucket
    #[command(display_order = 7)]
    Stats,

    /// Write exports to disk
    #[command(display_order = 8)]
    Export {
        #[command(subcommand)]
        action: ExportCommands,
    },

    /// Show or change configuration
    #[command(display_order = 9)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// Create a bucket
    Add {
        name: String,

        /// Keyword associated with the bucket
        #[arg(short, long, default_value = "")]
        keyword: String,
    },

    /// Delete a bucket, moving its notes to Uncategorized
    #[command(alias = "delete")]
    Rm { name: String },

    /// Restore a deleted bucket by name or id
    Restore {
        /// Name of the deleted bucket (first match wins)
        #[arg(required_unless_present = "id")]
        name: Option<String>,

        /// Id of the deleted bucket
        #[arg(long)]
        id: Option<Uuid>,
    },

    /// List buckets with their note counts
    #[command(alias = "ls")]
    List {
        /// List deleted buckets instead
        #[arg(long)]
        deleted: bool,
    },

    /// Show the notes of a bucket, oldest first
    Show { name: String },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Record a note against a test number
    Add {
        test_number: String,

        /// Note text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Bucket to file the note under; unknown buckets fall back to Uncategorized
        #[arg(short, long, default_value = UNCATEGORIZED)]
        bucket: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Test-number summary as CSV
    Csv {
        /// Directory to write into (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// One note as plain text
    Note {
        test_number: String,

        /// Timestamp of the note, as shown by `bucket show` (RFC 3339)
        timestamp: String,

        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Every note as text files in a .tar.gz
    Archive {
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get { key: String },

    /// Set a configuration value in the data directory's bucketnotes.toml
    Set { key: String, value: String },

    /// Generate a sample bucketnotes.toml
    Gen {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn note_add_joins_text_words() {
        let cli = Cli::parse_from([
            "bucketnotes", "note", "add", "T1", "fails", "on", "login", "--bucket", "Smoke",
        ]);
        match cli.command {
            Commands::Note {
                action: NoteCommands::Add { test_number, text, bucket },
            } => {
                assert_eq!(test_number, "T1");
                assert_eq!(bucket, "Smoke");
                assert_eq!(text.join(" "), "fails on login");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["bucketnotes", "stats", "--output", "json", "--data", "/tmp/x"]);
        assert_eq!(cli.output, OutputMode::Json);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn restore_needs_name_or_id() {
        assert!(Cli::try_parse_from(["bucketnotes", "bucket", "restore"]).is_err());
        let id = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from(["bucketnotes", "bucket", "restore", "--id", &id]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Bucket { action: BucketCommands::Restore { name: None, id: Some(_) } }
        ));
    }
}
