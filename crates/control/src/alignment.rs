// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root alignment (C5): reconciles the roots a server advertises against
//! the roots tracked locally. Invoked by the synchronizer (out of scope
//! here) whenever it discovers the server-side root list has drifted —
//! this crate never fetches that list itself.

use crate::controller::Controller;
use crate::error::Result;
use bindsync_core::{Clock, RootBinding, ServerBinding};
use bindsync_remote::{RemoteClientFactory, RemoteInfo};
use std::collections::HashSet;

impl<F: RemoteClientFactory, C: Clock> Controller<F, C> {
    /// `locals` are the RootBindings currently tracked for `server_binding`;
    /// `remotes` are the roots the server currently advertises for
    /// `repository`. Removes locals absent from `remotes`, adds remotes
    /// absent from `locals`, leaves the intersection untouched. Running
    /// this twice with the same inputs is a no-op the second time.
    pub fn align_roots(
        &self,
        server_binding: &ServerBinding,
        repository: &str,
        locals: &[RootBinding],
        remotes: &[RemoteInfo],
    ) -> Result<()> {
        let remote_uids: HashSet<&str> = remotes.iter().map(|r| r.uid.as_str()).collect();
        let local_uids: HashSet<&str> = locals.iter().map(|r| r.remote_root.as_str()).collect();

        for local in locals.iter().filter(|l| !remote_uids.contains(l.remote_root.as_str())) {
            tracing::info!(
                local_root = %local.local_root.display(),
                remote_root = local.remote_root,
                "root alignment: removing root absent from server"
            );
            let mut session = self.store().session()?;
            let tx = session.begin()?;
            bindsync_store::delete_root_binding(&tx, &local.local_root)?;
            tx.commit().map_err(bindsync_store::StoreError::from)?;
        }

        for remote in remotes.iter().filter(|r| !local_uids.contains(r.uid.as_str())) {
            tracing::info!(remote_root = remote.uid, "root alignment: adding root advertised by server");
            // Scoping a client here mirrors `bind_root`'s else branch; the
            // remote info is already in hand from the caller's root list,
            // so no additional round trip is needed to bind it locally.
            let _client = self.remote_client(server_binding, Some(&remote.uid), repository)?;
            self.local_bind_root(server_binding, remote, repository)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "alignment_tests.rs"]
mod tests;
