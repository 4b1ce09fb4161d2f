// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding registry (C2): CRUD over `ServerBinding` / `RootBinding` plus
//! `resolve_path`, the one-query-does-it-all path-to-root lookup every
//! local-path-facing operation goes through.

use crate::error::{Result, StoreError};
use bindsync_core::{is_strict_descendant, to_root_relative, CoreError, RootBinding, ServerBinding};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

fn row_to_server_binding(row: &Row) -> rusqlite::Result<ServerBinding> {
    Ok(ServerBinding {
        local_folder: PathBuf::from(row.get::<_, String>("local_folder")?),
        server_url: row.get("server_url")?,
        remote_user: row.get("remote_user")?,
        remote_password: row.get("remote_password")?,
        remote_token: row.get("remote_token")?,
    })
}

fn row_to_root_binding(row: &Row) -> rusqlite::Result<RootBinding> {
    Ok(RootBinding {
        local_root: PathBuf::from(row.get::<_, String>("local_root")?),
        server_binding_folder: PathBuf::from(row.get::<_, String>("server_binding_folder")?),
        remote_repo: row.get("remote_repo")?,
        remote_root: row.get("remote_root")?,
    })
}

pub fn find_server_binding(conn: &Connection, local_folder: &Path) -> Result<Option<ServerBinding>> {
    conn.query_row(
        "SELECT local_folder, server_url, remote_user, remote_password, remote_token \
         FROM server_bindings WHERE local_folder = ?1",
        params![local_folder.to_string_lossy()],
        row_to_server_binding,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn list_server_bindings(conn: &Connection) -> Result<Vec<ServerBinding>> {
    let mut stmt = conn.prepare(
        "SELECT local_folder, server_url, remote_user, remote_password, remote_token \
         FROM server_bindings ORDER BY local_folder",
    )?;
    let rows = stmt.query_map([], row_to_server_binding)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Inserts a new binding, or updates credentials in place for an existing
/// one at the same `local_folder`. Callers decide up-front (via
/// `find_server_binding`) whether an update is an `AlreadyBound` conflict;
/// this function always writes what it's given.
pub fn upsert_server_binding(conn: &Connection, binding: &ServerBinding) -> Result<()> {
    conn.execute(
        "INSERT INTO server_bindings(local_folder, server_url, remote_user, remote_password, remote_token) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(local_folder) DO UPDATE SET \
            server_url = excluded.server_url, \
            remote_user = excluded.remote_user, \
            remote_password = excluded.remote_password, \
            remote_token = excluded.remote_token",
        params![
            binding.local_folder.to_string_lossy(),
            binding.server_url,
            binding.remote_user,
            binding.remote_password,
            binding.remote_token,
        ],
    )?;
    Ok(())
}

/// Deletes a `ServerBinding`; cascades to its root bindings and pair
/// states via `ON DELETE CASCADE`.
pub fn delete_server_binding(conn: &Connection, local_folder: &Path) -> Result<()> {
    conn.execute(
        "DELETE FROM server_bindings WHERE local_folder = ?1",
        params![local_folder.to_string_lossy()],
    )?;
    Ok(())
}

pub fn find_root_binding(conn: &Connection, local_root: &Path) -> Result<Option<RootBinding>> {
    conn.query_row(
        "SELECT local_root, server_binding_folder, remote_repo, remote_root \
         FROM root_bindings WHERE local_root = ?1",
        params![local_root.to_string_lossy()],
        row_to_root_binding,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn list_root_bindings_for_server(conn: &Connection, server_local_folder: &Path) -> Result<Vec<RootBinding>> {
    let mut stmt = conn.prepare(
        "SELECT local_root, server_binding_folder, remote_repo, remote_root \
         FROM root_bindings WHERE server_binding_folder = ?1 ORDER BY local_root",
    )?;
    let rows = stmt.query_map(params![server_local_folder.to_string_lossy()], row_to_root_binding)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn list_all_root_bindings(conn: &Connection) -> Result<Vec<RootBinding>> {
    let mut stmt = conn.prepare(
        "SELECT local_root, server_binding_folder, remote_repo, remote_root FROM root_bindings",
    )?;
    let rows = stmt.query_map([], row_to_root_binding)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert_root_binding(conn: &Connection, binding: &RootBinding) -> Result<()> {
    conn.execute(
        "INSERT INTO root_bindings(local_root, server_binding_folder, remote_repo, remote_root) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            binding.local_root.to_string_lossy(),
            binding.server_binding_folder.to_string_lossy(),
            binding.remote_repo,
            binding.remote_root,
        ],
    )?;
    Ok(())
}

/// Deletes a `RootBinding`; cascades to its pair states.
pub fn delete_root_binding(conn: &Connection, local_root: &Path) -> Result<()> {
    conn.execute("DELETE FROM root_bindings WHERE local_root = ?1", params![local_root.to_string_lossy()])?;
    Ok(())
}

/// Finds the unique root binding that owns `absolute`, and the
/// root-relative path of `absolute` under it.
///
/// Tries an exact match first (the path *is* a root), then falls back to
/// prefix matching. Zero matches is `NotFound`; more than one is
/// `Ambiguous` (on-disk corruption, fatal).
pub fn resolve_path(conn: &Connection, absolute: &Path) -> Result<(RootBinding, String)> {
    if let Some(binding) = find_root_binding(conn, absolute)? {
        return Ok((binding, "/".to_string()));
    }

    let all = list_all_root_bindings(conn)?;
    // `filter_map` re-derives the relative path instead of trusting a
    // separate `is_strict_descendant` check, so a root binding can never
    // reach the single-match arm without a path to return for it.
    let mut matches: Vec<(RootBinding, String)> = all
        .into_iter()
        .filter(|rb| is_strict_descendant(&rb.local_root, absolute))
        .filter_map(|rb| to_root_relative(&rb.local_root, absolute).map(|relative| (rb, relative)))
        .collect();

    match matches.len() {
        0 => Err(StoreError::Core(CoreError::NotFound(format!(
            "no root binding contains {}",
            absolute.display()
        )))),
        1 => Ok(matches.remove(0)),
        _ => Err(StoreError::Core(CoreError::Ambiguous(format!(
            "{} matches {} root bindings",
            absolute.display(),
            matches.len()
        )))),
    }
}

#[cfg(test)]
#[path = "bindings_tests.rs"]
mod tests;
