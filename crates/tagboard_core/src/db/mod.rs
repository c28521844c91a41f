//! Durable slot storage on SQLite.
//!
//! # Responsibility
//! - Open the connection that backs the taxonomy, items and config slots.
//! - Bring its schema up to date before any slot is touched.
//!
//! # See also
//! - `crate::persist::slot_repo` for the reads and writes.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Directory for a file-backed database could not be created.
    ParentDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// One schema step failed; earlier steps of the same run are rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// Database was written by a newer tagboard.
    SchemaTooNew { found: u32, supported: u32 },
    MissingRequiredTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::ParentDir { path, source } => write!(
                f,
                "cannot create database directory `{}`: {source}",
                path.display()
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "slot database is at schema {found}, this build supports up to {supported}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "slot database lacks table `{table}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::ParentDir { source, .. } => Some(source),
            Self::SchemaTooNew { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
