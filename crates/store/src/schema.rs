// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema creation and the per-connection pragmas the binding registry's
//! cascading deletes depend on.

use crate::error::Result;
use rusqlite::Connection;

/// Bumped whenever `SCHEMA_SQL` changes in a way that is not purely additive.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS device_config (
    device_id   TEXT NOT NULL PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS server_bindings (
    local_folder    TEXT NOT NULL PRIMARY KEY,
    server_url      TEXT NOT NULL,
    remote_user     TEXT NOT NULL,
    remote_password TEXT,
    remote_token    TEXT
);

CREATE TABLE IF NOT EXISTS root_bindings (
    local_root            TEXT NOT NULL PRIMARY KEY,
    server_binding_folder TEXT NOT NULL REFERENCES server_bindings(local_folder) ON DELETE CASCADE,
    remote_repo           TEXT NOT NULL,
    remote_root           TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_root_bindings_server
    ON root_bindings(server_binding_folder);

CREATE TABLE IF NOT EXISTS last_known_states (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    local_folder          TEXT NOT NULL,
    local_root            TEXT NOT NULL REFERENCES root_bindings(local_root) ON DELETE CASCADE,
    path                  TEXT,
    parent_path           TEXT,
    local_name            TEXT,
    remote_ref            TEXT,
    remote_parent_ref     TEXT,
    remote_name           TEXT,
    remote_path           TEXT,
    folderish             INTEGER NOT NULL,
    local_state           TEXT NOT NULL,
    remote_state          TEXT NOT NULL,
    pair_state            TEXT NOT NULL,
    last_sync_error_date  TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_pair_local_root_path
    ON last_known_states(local_root, path);
CREATE INDEX IF NOT EXISTS idx_pair_local_root_remote_ref
    ON last_known_states(local_root, remote_ref);
CREATE INDEX IF NOT EXISTS idx_pair_remote_ref
    ON last_known_states(remote_ref);
CREATE INDEX IF NOT EXISTS idx_pair_parent_path
    ON last_known_states(local_root, parent_path);
CREATE INDEX IF NOT EXISTS idx_pair_remote_parent_ref
    ON last_known_states(local_root, remote_parent_ref);
CREATE INDEX IF NOT EXISTS idx_pair_ordering
    ON last_known_states(path, remote_path);
"#;

/// Creates the schema if absent and enables the pragmas the registry's
/// cascading deletes rely on. Idempotent: safe to call on every open.
pub fn init(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA_SQL)?;
    let current: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if current == 0 {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    } else if current > SCHEMA_VERSION {
        tracing::warn!(
            "database schema version {current} is newer than this build supports ({SCHEMA_VERSION})"
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
