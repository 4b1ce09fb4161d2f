// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn open_creates_db_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path(), false).unwrap();
    assert!(dir.path().join(DB_FILE_NAME).exists());
    store.dispose();
}

#[test]
fn open_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store1 = Store::open(dir.path(), false).unwrap();
    store1.dispose();
    let store2 = Store::open(dir.path(), false).unwrap();
    store2.dispose();
}

#[test]
fn session_supports_commit_and_rollback() {
    let store = Store::open_in_memory().unwrap();
    let mut session = store.session().unwrap();

    {
        let tx = session.begin().unwrap();
        tx.execute(
            "INSERT INTO device_config(device_id) VALUES ('dev-a')",
            [],
        )
        .unwrap();
        tx.rollback().unwrap();
    }
    let count: i64 = session
        .connection()
        .query_row("SELECT COUNT(*) FROM device_config", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);

    {
        let tx = session.begin().unwrap();
        tx.execute(
            "INSERT INTO device_config(device_id) VALUES ('dev-a')",
            [],
        )
        .unwrap();
        tx.commit().unwrap();
    }
    let count: i64 = session
        .connection()
        .query_row("SELECT COUNT(*) FROM device_config", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn dropped_transaction_without_commit_rolls_back() {
    let store = Store::open_in_memory().unwrap();
    let mut session = store.session().unwrap();
    {
        let tx = session.begin().unwrap();
        tx.execute("INSERT INTO device_config(device_id) VALUES ('dev-a')", []).unwrap();
        // tx dropped here without commit()
    }
    let count: i64 = session
        .connection()
        .query_row("SELECT COUNT(*) FROM device_config", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
