use expense_core::db::migrations::latest_version;
use expense_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "expenses");
}

#[test]
fn reopening_file_database_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "expenses");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn expenses_index_orders_by_creation_then_insertion() {
    let conn = open_db_in_memory().unwrap();

    let sql: String = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'index' AND name = 'idx_expenses_created_at';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(sql.contains("expenses (created_at DESC, seq DESC)"), "{sql}");
}

#[test]
fn expense_columns_are_required() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('expenses') WHERE \"notnull\" = 1 ORDER BY cid;")
        .unwrap();
    let required: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        required,
        vec!["id", "title", "amount", "category", "date", "created_at"]
    );

    let missing_title = conn.execute(
        "INSERT INTO expenses (id, amount, category, date, created_at)
         VALUES ('a', 1.0, 'Food', '2026-01-01', 1);",
        [],
    );
    assert!(missing_title.is_err());
}

#[test]
fn expense_ids_are_unique() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO expenses (id, title, amount, category, date, created_at)
                  VALUES ('same', 'x', 1.0, 'Food', '2026-01-01', 1);";

    conn.execute(insert, []).unwrap();
    assert!(conn.execute(insert, []).is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
