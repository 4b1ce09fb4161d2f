// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pair-state aggregator (C7): read-only UI queries over the bindings and
//! pair states tracked by C1/C2. `children_states` is the one entry point
//! a shell-extension or status window needs to render a folder listing.

use crate::controller::Controller;
use crate::error::Result;
use bindsync_core::{normalize_local_path, Clock};
use bindsync_remote::RemoteClientFactory;
use std::path::Path;

/// One row of a `children_states` listing: a display name and its
/// aggregated state (`"synchronized"`, `"children_modified"`, or one of
/// [`bindsync_core::PairState::as_str`]'s values for a leaf).
pub type ChildState = (String, String);

impl<F: RemoteClientFactory, C: Clock> Controller<F, C> {
    /// Mirrors `original_source`'s `_pair_states_recursive`, minus the early
    /// `break` that let one early-sorted synchronized sibling mask later
    /// unsynchronized ones — every descendant is checked here, not just a
    /// prefix of them, so a single dirty leaf taints its whole ancestor
    /// chain regardless of sort order.
    pub fn children_states(&self, folder_path: &Path) -> Result<Vec<ChildState>> {
        let folder_path = normalize_local_path(&bindsync_core::expand_user(folder_path));
        let session = self.store().session()?;
        let conn = session.connection();

        let server_bindings = bindsync_store::list_server_bindings(conn)?;
        if let Some(server) = server_bindings.iter().find(|s| s.local_folder == folder_path) {
            let mut rows = Vec::new();
            for root in bindsync_store::list_root_bindings_for_server(conn, &server.local_folder)? {
                let name = display_name(&root.local_root);
                let synchronized = bindsync_store::all_descendants_synchronized(
                    conn,
                    &root.local_root,
                    Some("/"),
                    Some(root.remote_root.as_str()),
                )?;
                rows.push((name, if synchronized { "synchronized".to_string() } else { "children_modified".to_string() }));
            }
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            return Ok(rows);
        }

        let Ok((root, relative)) = bindsync_store::resolve_path(conn, &folder_path) else {
            return Ok(Vec::new());
        };
        let Some(parent) = bindsync_store::find_by_path(conn, &root.local_root, &relative)? else {
            return Ok(Vec::new());
        };

        let children = bindsync_store::list_children(
            conn,
            &root.local_root,
            parent.path.as_deref(),
            parent.remote_ref.as_deref(),
        )?;

        let mut rows = Vec::with_capacity(children.len());
        for child in children {
            let name = child.local_name.clone().or_else(|| child.remote_name.clone()).unwrap_or_default();
            let state = if child.folderish {
                let synchronized = bindsync_store::all_descendants_synchronized(
                    conn,
                    &root.local_root,
                    child.path.as_deref(),
                    child.remote_ref.as_deref(),
                )?;
                if synchronized { "synchronized".to_string() } else { "children_modified".to_string() }
            } else {
                child.pair_state().as_str().to_string()
            };
            rows.push((name, state));
        }
        Ok(rows)
    }
}

fn display_name(local_root: &Path) -> String {
    local_root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
