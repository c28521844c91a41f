//! Connection bootstrap.
//!
//! Every returned connection is fully migrated. Each open logs one start
//! event and one ok or error event.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when needed) the slot database at `path`.
///
/// Missing parent directories are created first.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::ParentDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    bootstrap("file", Connection::open(path).map_err(DbError::from))
}

/// Opens a private in-memory slot database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory().map_err(DbError::from))
}

fn bootstrap(mode: &'static str, opened: DbResult<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = opened.and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let (from, to) = apply_migrations(&mut conn)?;
        info!(
            "event=db_open module=db status=ok mode={mode} schema_from={from} schema_to={to} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    });

    if let Err(err) = &result {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        );
    }
    result
}
