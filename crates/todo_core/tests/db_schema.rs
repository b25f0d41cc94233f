use rusqlite::Connection;
use todo_core::db::{open_db, open_db_in_memory, schema_version, DbError, SCHEMA_VERSION};
use todo_core::{BlobStore, LoadOutcome, SqliteBlobStore, TodoStore};

#[test]
fn fresh_in_memory_database_accepts_blob_writes() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

    let mut blobs = SqliteBlobStore::try_new(&conn).unwrap();
    blobs.set("enhancedTodos", "[]").unwrap();
    assert_eq!(blobs.get("enhancedTodos").unwrap().as_deref(), Some("[]"));
}

#[test]
fn reopening_keeps_schema_version_and_stored_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut store = TodoStore::open(SqliteBlobStore::try_new(&conn).unwrap());
        store.add("Renew passport").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    let store = TodoStore::open(SqliteBlobStore::try_new(&conn).unwrap());
    assert!(matches!(store.last_load(), LoadOutcome::Loaded { count: 1 }));
    assert_eq!(store.todos()[0].text, "Renew passport");
}

#[test]
fn blank_database_file_gets_kv_table_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")
        .unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    let mut blobs = SqliteBlobStore::try_new(&conn).unwrap();
    assert!(blobs.get("enhancedTodos").unwrap().is_none());
    blobs.set("enhancedTodos", "[]").unwrap();

    let unrelated: i64 = conn
        .query_row("SELECT COUNT(*) FROM unrelated;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(unrelated, 0);
}

#[test]
fn database_from_newer_build_is_refused_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let newer = SCHEMA_VERSION + 1;
    Connection::open(&path)
        .unwrap()
        .execute_batch(&format!("PRAGMA user_version = {newer};"))
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, supported } if found == newer && supported == SCHEMA_VERSION
    ));
    assert!(err.to_string().contains("supports up to"));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), newer);
    let kv_tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(kv_tables, 0);
}
