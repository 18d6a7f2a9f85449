//! Traced connection integration tests

use pretty_assertions::assert_eq;
use rusqlite::ToSql;
use sqlscope_storage::TracedConnection;
use tests::db::TestDatabase;
use tests::memory::debug_logger;
use tests::Encoding;

const SCHEMA: &str = "
    CREATE TABLE category (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE book (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        isbn TEXT,
        price REAL,
        category_id INTEGER NOT NULL REFERENCES category(id)
    );
";

#[test]
fn test_database_creates_file() {
    let memory = debug_logger(Encoding::Console);
    let test_db = TestDatabase::new(memory.logger.clone());
    assert!(test_db.db_path().exists());
}

#[test]
fn test_insert_and_select_are_traced() {
    let memory = debug_logger(Encoding::Json);
    let test_db = TestDatabase::new(memory.logger.clone());
    let db = &test_db.db;

    db.execute_batch(SCHEMA).unwrap();
    db.execute(
        "INSERT INTO category (id, name) VALUES (?, ?)",
        &[&1_i64, &"Technical Book"],
    )
    .unwrap();
    let missing_isbn: Option<String> = None;
    db.execute(
        "INSERT INTO book (title, isbn, price, category_id) VALUES (?1, ?2, ?3, ?4)",
        &[&"Go in Action", &missing_isbn, &39.99_f64, &1_i64],
    )
    .unwrap();
    let inserts: Vec<serde_json::Value> = memory
        .output
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        inserts.last().unwrap()["message"],
        "[sql] : INSERT INTO book (title, isbn, price, category_id) VALUES ('Go in Action', NULL, 39.99, 1)"
    );
    memory.output.clear();

    let title: String = db
        .query_row(
            "SELECT title FROM book WHERE category_id = ?",
            &[&1_i64],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(title, "Go in Action");

    let records: Vec<serde_json::Value> = memory
        .output
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["message"],
        "[sql] : SELECT title FROM book WHERE category_id = 1"
    );
    assert_eq!(records[0]["rows"], 1);
    let source = records[0]["source"].as_str().unwrap();
    assert!(source.contains("storage"), "unexpected source: {}", source);
}

#[test]
fn test_numeric_placeholders_with_null() {
    let memory = debug_logger(Encoding::Console);
    let db = TracedConnection::open_in_memory(memory.logger.clone()).unwrap();
    db.execute_batch(SCHEMA).unwrap();
    db.execute(
        "INSERT INTO category (name, id) VALUES (?2, ?1)",
        &[&2_i64, &"Novel"],
    )
    .unwrap();
    assert!(memory
        .output
        .contents()
        .contains("[sql] : INSERT INTO category (name, id) VALUES ('Novel', 2)"));

    let missing: Option<String> = None;
    let params: [&dyn ToSql; 3] = [&"Norwegian Wood", &missing, &2_i64];
    db.execute(
        "INSERT INTO book (title, isbn, category_id) VALUES ($1, $2, $3)",
        &params,
    )
    .unwrap();

    assert!(memory.output.contents().contains(
        "[sql] : INSERT INTO book (title, isbn, category_id) VALUES ('Norwegian Wood', NULL, 2)"
    ));
}

#[test]
fn test_foreign_keys_are_enforced() {
    let memory = debug_logger(Encoding::Console);
    let db = TracedConnection::open_in_memory(memory.logger.clone()).unwrap();
    db.execute_batch(SCHEMA).unwrap();

    let result = db.execute(
        "INSERT INTO book (title, category_id) VALUES (?, ?)",
        &[&"Orphan", &99_i64],
    );
    assert!(result.is_err());
    assert!(memory
        .output
        .contents()
        .contains("[sql] : INSERT INTO book (title, category_id) VALUES ('Orphan', 99)"));
}

#[test]
fn test_untraced_connection_access() {
    let memory = debug_logger(Encoding::Console);
    let db = TracedConnection::open_in_memory(memory.logger.clone()).unwrap();
    db.connection().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
    assert!(memory.output.contents().is_empty());
}
