// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Store: a connection pool over `<config_folder>/bindsync.db`, plus
//! the per-execution-context [`Session`] handles drawn from it.

use crate::error::Result;
use crate::schema;
use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

/// Database file name inside the configuration folder.
pub const DB_FILE_NAME: &str = "bindsync.db";

/// Environment variable whose mere presence (value ignored) turns on SQL
/// tracing, matching the "opt-in debug flag for SQL tracing" in the
/// external-interfaces surface.
pub const LOG_SQL_ENV_VAR: &str = "BINDSYNC_LOG_SQL";

#[derive(Debug)]
struct InitConnection;

impl CustomizeConnection<Connection, rusqlite::Error> for InitConnection {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        schema::init(conn).map_err(|e| match e {
            crate::error::StoreError::Sqlite(e) => e,
            other => rusqlite::Error::ModuleError(other.to_string()),
        })
    }
}

/// Scoped session handle: release returns the underlying connection to
/// the pool. Acquire one per execution context (thread/task); never
/// share a session across contexts.
pub struct Session {
    pub(crate) conn: r2d2::PooledConnection<SqliteConnectionManager>,
}

impl Session {
    /// Begins an explicit transaction. The returned [`rusqlite::Transaction`]
    /// exposes `.commit()` / `.rollback()`; dropping it without either rolls
    /// the transaction back, so a control operation that returns early on
    /// error never leaves a partial commit behind.
    pub fn begin(&mut self) -> Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Direct read-only access, for queries that don't need to participate
    /// in a write transaction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub struct Store {
    pool: Pool<SqliteConnectionManager>,
}

impl Store {
    /// Opens (creating if absent) the store under `config_folder`, creating
    /// the schema on first use. `debug_log_sql` is normally derived from
    /// [`LOG_SQL_ENV_VAR`]'s presence, not passed explicitly.
    pub fn open(config_folder: &Path, debug_log_sql: bool) -> Result<Self> {
        std::fs::create_dir_all(config_folder)?;
        let db_path = config_folder.join(DB_FILE_NAME);
        if debug_log_sql {
            tracing::debug!(path = %db_path.display(), "opening store with SQL tracing enabled");
        }
        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .connection_customizer(Box::new(InitConnection))
            .build(manager)?;
        // Touch the pool once up front so schema creation happens eagerly
        // rather than lazily on the first caller.
        let _ = pool.get()?;
        Ok(Self { pool })
    }

    /// In-memory store, used by tests and anything that doesn't want a
    /// file on disk.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .connection_customizer(Box::new(InitConnection))
            .build(manager)?;
        Ok(Self { pool })
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session { conn: self.pool.get()? })
    }

    /// Closes all sessions and tears down the connection pool. The `Store`
    /// cannot be used after this; drop it.
    pub fn dispose(self) {
        drop(self.pool);
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
