//! Ordered schema steps for the slot database.
//!
//! Each step runs once; `PRAGMA user_version` records the last one applied.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "slots",
        sql: include_str!("0001_slots.sql"),
    },
];

/// Schema version a fully migrated database reports.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Runs every step newer than the stored version inside one transaction.
///
/// Returns the `(from, to)` versions.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<(u32, u32)> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = STEPS.iter().filter(|step| step.version > found);
    let tx = conn.transaction()?;
    let mut reached = found;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
        reached = step.version;
    }
    tx.commit()?;

    if reached != found {
        info!("event=db_migrate module=db status=ok from={found} to={reached}");
    }
    Ok((found, reached))
}
