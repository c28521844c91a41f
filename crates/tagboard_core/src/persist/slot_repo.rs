//! Durable slot contract and SQLite implementation.

use super::{PersistResult, SlotName};
use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value substrate holding the serialized documents.
pub trait SlotRepository {
    /// Reads one slot. Missing and empty slots both read as `None`.
    fn read_slot(&self, slot: SlotName) -> PersistResult<Option<String>>;
    /// Writes one slot, replacing any previous value.
    fn write_slot(&self, slot: SlotName, value: &str) -> PersistResult<()>;
}

/// SQLite-backed slot repository over the `slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> PersistResult<Self> {
        if !table_exists(conn, "slots")? {
            return Err(DbError::MissingRequiredTable("slots").into());
        }
        Ok(Self { conn })
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, slot: SlotName) -> PersistResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1;",
                [slot.key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.filter(|text| !text.trim().is_empty()))
    }

    fn write_slot(&self, slot: SlotName, value: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![slot.key(), value],
        )?;
        debug!(
            "event=slot_write module=persist status=ok slot={} bytes={}",
            slot,
            value.len()
        );
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> PersistResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
