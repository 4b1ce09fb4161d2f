// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pair-state persistence: the CRUD and queries that sit under
//! `list_pending`/`next_pending`/`get_state` (C4) and `children_states`
//! (C7).

use crate::error::Result;
use bindsync_core::{LastKnownState, PairState, SideState};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

fn row_to_state(row: &Row) -> rusqlite::Result<LastKnownState> {
    let local_state: String = row.get("local_state")?;
    let remote_state: String = row.get("remote_state")?;
    let last_sync_error_date: Option<String> = row.get("last_sync_error_date")?;
    Ok(LastKnownState {
        local_folder: PathBuf::from(row.get::<_, String>("local_folder")?),
        local_root: PathBuf::from(row.get::<_, String>("local_root")?),
        path: row.get("path")?,
        parent_path: row.get("parent_path")?,
        local_name: row.get("local_name")?,
        remote_ref: row.get("remote_ref")?,
        remote_parent_ref: row.get("remote_parent_ref")?,
        remote_name: row.get("remote_name")?,
        remote_path: row.get("remote_path")?,
        folderish: row.get("folderish")?,
        local_state: SideState::parse(&local_state),
        remote_state: SideState::parse(&remote_state),
        last_sync_error_date: last_sync_error_date
            .map(|s| DateTime::parse_from_rfc3339(&s).map(|d| d.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| rusqlite::Error::InvalidColumnType(0, e.to_string(), rusqlite::types::Type::Text))?,
    })
}

const SELECT_COLUMNS: &str = "local_folder, local_root, path, parent_path, local_name, remote_ref, \
     remote_parent_ref, remote_name, remote_path, folderish, local_state, remote_state, last_sync_error_date";

/// Inserts a new pair state, or replaces the one at the same
/// `(local_root, path)` if `path` is set and already tracked. The derived
/// `pair_state` column is recomputed from the side states on every write.
pub fn upsert_state(conn: &Connection, state: &LastKnownState) -> Result<()> {
    let pair_state = state.pair_state();
    conn.execute(
        &format!(
            "INSERT INTO last_known_states({SELECT_COLUMNS}, pair_state) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
             ON CONFLICT(local_root, path) DO UPDATE SET \
                parent_path = excluded.parent_path, \
                local_name = excluded.local_name, \
                remote_ref = excluded.remote_ref, \
                remote_parent_ref = excluded.remote_parent_ref, \
                remote_name = excluded.remote_name, \
                remote_path = excluded.remote_path, \
                folderish = excluded.folderish, \
                local_state = excluded.local_state, \
                remote_state = excluded.remote_state, \
                pair_state = excluded.pair_state, \
                last_sync_error_date = excluded.last_sync_error_date"
        ),
        params![
            state.local_folder.to_string_lossy(),
            state.local_root.to_string_lossy(),
            state.path,
            state.parent_path,
            state.local_name,
            state.remote_ref,
            state.remote_parent_ref,
            state.remote_name,
            state.remote_path,
            state.folderish,
            state.local_state.as_str(),
            state.remote_state.as_str(),
            state.last_sync_error_date.map(|d| d.to_rfc3339()),
            pair_state.as_str(),
        ],
    )?;
    Ok(())
}

/// Deletes a tracked pair. Legal only once both sides are absent, a rule
/// enforced by callers (scanners/synchronizer), not by the store.
pub fn delete_state(conn: &Connection, local_root: &Path, path: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM last_known_states WHERE local_root = ?1 AND path = ?2",
        params![local_root.to_string_lossy(), path],
    )?;
    Ok(())
}

pub fn find_by_path(conn: &Connection, local_root: &Path, path: &str) -> Result<Option<LastKnownState>> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM last_known_states WHERE local_root = ?1 AND path = ?2"),
        params![local_root.to_string_lossy(), path],
        row_to_state,
    )
    .optional()
    .map_err(Into::into)
}

/// All pair states sharing `remote_ref`, across every root binding. A
/// `remote_ref` can legitimately appear under more than one root when the
/// same document is reachable through multiple bindings; callers
/// disambiguate with the owning root's `(server_url, repo)`.
pub fn find_all_by_remote_ref(conn: &Connection, remote_ref: &str) -> Result<Vec<LastKnownState>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM last_known_states WHERE remote_ref = ?1"))?;
    let rows = stmt.query_map(params![remote_ref], row_to_state)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Up to `limit` non-synchronized pair states, optionally scoped to one
/// server binding's local folder and filtered by the error cooldown.
/// Ordered ascending by `(path, remote_path)` so ancestors precede
/// descendants (invariant 5, spec seed test 4).
pub fn list_pending(
    conn: &Connection,
    limit: u32,
    local_folder: Option<&Path>,
    ignore_in_error_seconds: i64,
    now: DateTime<Utc>,
) -> Result<Vec<LastKnownState>> {
    const QUALIFIED_COLUMNS: &str = "lks.local_folder, lks.local_root, lks.path, lks.parent_path, \
         lks.local_name, lks.remote_ref, lks.remote_parent_ref, lks.remote_name, lks.remote_path, \
         lks.folderish, lks.local_state, lks.remote_state, lks.last_sync_error_date";
    // `?1 IS NULL` keeps the placeholder count fixed regardless of whether
    // a folder filter was requested, instead of building two different SQL
    // strings with different bind-parameter counts.
    let sql = format!(
        "SELECT {QUALIFIED_COLUMNS} FROM last_known_states lks \
         JOIN root_bindings rb ON rb.local_root = lks.local_root \
         WHERE lks.pair_state != 'synchronized' \
           AND (?1 IS NULL OR rb.server_binding_folder = ?1) \
         ORDER BY lks.path ASC, lks.remote_path ASC LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let folder_str = local_folder.map(|p| p.to_string_lossy().into_owned());
    let rows = stmt
        .query_map(params![folder_str, limit], row_to_state)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let cooldown_cutoff = if ignore_in_error_seconds > 0 {
        Some(now - chrono::Duration::seconds(ignore_in_error_seconds))
    } else {
        None
    };
    Ok(rows
        .into_iter()
        .filter(|s| match (cooldown_cutoff, s.last_sync_error_date) {
            (Some(cutoff), Some(failed_at)) => failed_at < cutoff,
            _ => true,
        })
        .collect())
}

/// Direct children of `parent_path` under `local_root`: pairs whose
/// `parent_path` matches, or whose `remote_parent_ref` matches the parent's
/// `remote_ref` (catches a move on either side), per §4.7. Falls back to
/// whichever side is known when only one is available on the parent.
pub fn list_children(
    conn: &Connection,
    local_root: &Path,
    parent_path: Option<&str>,
    parent_remote_ref: Option<&str>,
) -> Result<Vec<LastKnownState>> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM last_known_states \
         WHERE local_root = ?1 \
           AND ((?2 IS NOT NULL AND parent_path = ?2) OR (?3 IS NOT NULL AND remote_parent_ref = ?3)) \
         ORDER BY local_name ASC, remote_name ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![local_root.to_string_lossy(), parent_path, parent_remote_ref], row_to_state)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// All descendants (not just direct children) of the pair identified by
/// `(parent_path, parent_remote_ref)` under `local_root`, used to decide a
/// folder's aggregated state: `synchronized` iff every descendant is
/// `synchronized` (§4.7, spec seed test 6 — the "any unsynced taints the
/// folder" rule, not the source's early-`break`).
///
/// Walks the same `parent_path = ? OR remote_parent_ref = ?` rule
/// [`list_children`] uses, recursively, rather than scanning `path` as a
/// string prefix — a descendant known only by `remote_ref` (no local
/// `path` yet, e.g. a remotely-created document) has no prefix to match
/// and would otherwise be silently skipped.
pub fn all_descendants_synchronized(
    conn: &Connection,
    local_root: &Path,
    parent_path: Option<&str>,
    parent_remote_ref: Option<&str>,
) -> Result<bool> {
    for child in list_children(conn, local_root, parent_path, parent_remote_ref)? {
        if child.pair_state() != PairState::Synchronized {
            return Ok(false);
        }
        if child.folderish
            && !all_descendants_synchronized(conn, local_root, child.path.as_deref(), child.remote_ref.as_deref())?
        {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "pair_state_tests.rs"]
mod tests;
