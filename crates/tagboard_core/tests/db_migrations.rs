use rusqlite::Connection;
use tagboard_core::db::migrations::{apply_migrations, latest_version, schema_version};
use tagboard_core::db::{open_db, open_db_in_memory, DbError};

fn has_table(conn: &Connection, table: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table],
        |row| row.get::<_, i64>(0),
    )
    .expect("sqlite_master should be queryable")
        == 1
}

#[test]
fn fresh_memory_database_has_slot_tables() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_eq!(schema_version(&conn).expect("schema version should read"), latest_version());
    assert!(has_table(&conn, "slots"));
}

#[test]
fn migrating_an_up_to_date_database_is_a_no_op() {
    let mut conn = open_db_in_memory().expect("in-memory db should open");
    let latest = latest_version();

    assert_eq!(apply_migrations(&mut conn).expect("migrations should apply"), (latest, latest));
}

#[test]
fn unversioned_database_with_slots_table_keeps_its_rows() {
    let mut conn = Connection::open_in_memory().expect("raw connection should open");
    conn.execute_batch(
        "CREATE TABLE slots (name TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL, updated_at INTEGER NOT NULL DEFAULT 0);
         INSERT INTO slots (name, value) VALUES ('taxonomy', 'colors: [red]');",
    )
    .expect("legacy table should be created");

    assert_eq!(apply_migrations(&mut conn).expect("migrations should apply"), (0, latest_version()));
    let kept: String = conn
        .query_row("SELECT value FROM slots WHERE name = 'taxonomy';", [], |row| row.get(0))
        .expect("kept row should be readable");
    assert_eq!(kept, "colors: [red]");
}

#[test]
fn file_database_is_created_under_missing_directories() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("nested").join("state").join("tagboard.sqlite3");

    drop(open_db(&path).expect("first open should create the file"));
    let reopened = open_db(&path).expect("reopen should succeed");

    assert!(path.exists());
    assert_eq!(schema_version(&reopened).expect("schema version should read"), latest_version());
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .expect("raw connection should open")
        .execute_batch("PRAGMA user_version = 999;")
        .expect("user_version should be set");

    match open_db(&path).expect_err("newer schema should be refused") {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
