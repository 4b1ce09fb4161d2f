// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-client cache (C3): one instance per execution context (thread or
//! task), never shared. Memoizes clients by the tuple spec §4.3 names and
//! applies any pending fault-injection to every client it hands out.

use crate::client::{Credentials, RemoteClient, RemoteClientFactory};
use crate::error::{RemoteError, Result};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    server_url: String,
    user: String,
    device_id: String,
    base_folder: Option<String>,
    repository: String,
}

pub struct RemoteClientCache<F: RemoteClientFactory> {
    factory: F,
    clients: HashMap<CacheKey, Arc<dyn RemoteClient>>,
    /// Sticky fault applied to every client returned by [`Self::get`] until
    /// cleared. Intentionally process-context state, not a global (design
    /// note 9): owned by this cache instance alone.
    injected_fault: Option<RemoteError>,
}

impl<F: RemoteClientFactory> RemoteClientCache<F> {
    pub fn new(factory: F) -> Self {
        Self { factory, clients: HashMap::new(), injected_fault: None }
    }

    /// Returns the memoized client for this key, constructing it on miss.
    pub fn get(
        &mut self,
        server_url: &str,
        user: &str,
        device_id: &str,
        credentials: &Credentials,
        base_folder: Option<&str>,
        repository: &str,
    ) -> Result<Arc<dyn RemoteClient>> {
        let key = CacheKey {
            server_url: server_url.to_string(),
            user: user.to_string(),
            device_id: device_id.to_string(),
            base_folder: base_folder.map(str::to_string),
            repository: repository.to_string(),
        };

        let client = match self.clients.get(&key) {
            Some(client) => Arc::clone(client),
            None => {
                let client =
                    self.factory.create(server_url, user, device_id, credentials, base_folder, repository)?;
                self.clients.insert(key, Arc::clone(&client));
                client
            }
        };
        client.inject_fault(self.injected_fault.clone());
        Ok(client)
    }

    /// Evicts every cached client whose `server_url` matches.
    pub fn invalidate(&mut self, server_url: &str) {
        self.clients.retain(|key, _| key.server_url != server_url);
    }

    /// Arms the sticky fault every subsequently returned client raises
    /// from its next call. `None` clears it.
    pub fn make_raise(&mut self, fault: Option<RemoteError>) {
        self.injected_fault = fault;
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
