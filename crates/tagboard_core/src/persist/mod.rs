//! Reconciliation between session state and durable slots.
//!
//! # Responsibility
//! - Read/write the three named slots (taxonomy, items, config).
//! - Load once at startup, preferring storage over the built-in seed.
//! - Flush on a schedule and on export without clobbering good data.
//!
//! # Invariants
//! - A missing or empty slot is not an error; callers fall back to the seed.
//! - An empty in-memory store never overwrites a persisted slot.
//! - A slot whose stored text failed to parse is not written until new text
//!   for that document is applied.

mod bridge;
pub mod seed;
mod slot_repo;

pub use bridge::{DocumentState, FlushReport, LoadReport, LoadSource, PersistenceBridge};
pub use slot_repo::{SlotRepository, SqliteSlotRepository};

use crate::codec::{DocumentKind, FormatError, ParseError};
use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Named durable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotName {
    Taxonomy,
    Items,
    Config,
}

impl SlotName {
    pub const ALL: [SlotName; 3] = [Self::Taxonomy, Self::Items, Self::Config];

    /// Storage key of this slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Taxonomy => "taxonomy",
            Self::Items => "items",
            Self::Config => "config",
        }
    }

    pub fn document(self) -> DocumentKind {
        match self {
            Self::Taxonomy => DocumentKind::Taxonomy,
            Self::Items => DocumentKind::Items,
            Self::Config => DocumentKind::Configuration,
        }
    }
}

impl Display for SlotName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    Format(FormatError),
    /// Built-in seed text failed to parse.
    Seed(ParseError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Seed(err) => write!(f, "built-in seed is invalid: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Seed(err) => Some(err),
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<FormatError> for PersistError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}
