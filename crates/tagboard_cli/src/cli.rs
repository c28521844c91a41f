//! Command-line surface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tagboard_core::DocumentKind;

#[derive(Debug, Parser)]
#[command(
    name = "tagboard",
    version,
    about = "Maintain tagged items against a category taxonomy"
)]
pub struct Cli {
    /// SQLite file holding the durable slots.
    #[arg(long, env = "TAGBOARD_DB_PATH", global = true)]
    pub db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "TAGBOARD_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

/// One line typed into the interactive loop.
#[derive(Debug, Parser)]
#[command(name = "", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show all items, or one item's tags per category.
    Show { item: Option<String> },
    /// Create an item with no tags.
    AddItem { name: String },
    /// Append a tag to an existing category.
    AddTag { category: String, name: String },
    /// Append an empty category.
    AddCategory { name: String },
    /// Toggle one or more tags on an item, committed as one change.
    Toggle {
        item: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Replace a document with the contents of a file.
    Import {
        #[arg(value_enum)]
        document: DocumentArg,
        file: PathBuf,
    },
    /// Write timestamped taxonomy and item files.
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print a serialized document verbatim.
    Copy {
        #[arg(value_enum)]
        document: DocumentArg,
    },
    /// Show configuration, one option, or set an option.
    Config {
        key: Option<String>,
        value: Option<String>,
    },
    /// Show and dismiss the last parse error.
    Errors,
    /// Interactive loop with periodic flushing.
    Repl,
    /// Leave the interactive loop.
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// Whether a successful run may have changed session state.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::AddItem { .. }
                | Self::AddTag { .. }
                | Self::AddCategory { .. }
                | Self::Toggle { .. }
                | Self::Import { .. }
                | Self::Config { value: Some(_), .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentArg {
    Tags,
    Items,
    Config,
}

impl From<DocumentArg> for DocumentKind {
    fn from(value: DocumentArg) -> Self {
        match value {
            DocumentArg::Tags => DocumentKind::Taxonomy,
            DocumentArg::Items => DocumentKind::Items,
            DocumentArg::Config => DocumentKind::Configuration,
        }
    }
}
