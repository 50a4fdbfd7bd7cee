use department_core::db::{open_db, open_db_in_memory, DbError};
use department_core::{DepartmentRepository, DepartmentStore};

#[test]
fn open_db_in_memory_configures_connection() {
    let conn = open_db_in_memory().unwrap();

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
    assert!(conn.is_autocommit());
}

#[test]
fn in_memory_databases_are_independent() {
    let first = open_db_in_memory().unwrap();
    let second = open_db_in_memory().unwrap();

    let mut store = DepartmentStore::new(&first);
    store.create_table().unwrap();
    store.create("Payroll", "Building A").unwrap();

    let mut other = DepartmentStore::new(&second);
    other.create_table().unwrap();
    assert!(other.get_all().unwrap().is_empty());
}

#[test]
fn reopening_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("departments.sqlite3");

    let conn = open_db(&path).unwrap();
    let mut store = DepartmentStore::new(&conn);
    store.create_table().unwrap();
    store.create("Payroll", "Building A").unwrap();
    drop(store);
    drop(conn);

    let conn = open_db(&path).unwrap();
    let mut store = DepartmentStore::new(&conn);
    store.create_table().unwrap();
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].borrow().name, "Payroll");
}

#[test]
fn opening_unreachable_path_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("departments.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}
