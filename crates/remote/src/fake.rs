// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake for [`RemoteClient`]/[`RemoteClientFactory`]. Used by
//! `bindsync-control`'s tests to exercise C4/C5 without real network I/O.

use crate::client::{Credentials, RemoteClient, RemoteClientFactory, RemoteInfo};
use crate::error::{RemoteError, Result};
use bindsync_core::CoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct FakeRemoteFixture {
    /// `path -> info`, scoped by the full document path the client was
    /// constructed with as its base folder.
    pub infos: HashMap<String, RemoteInfo>,
    pub writable: HashMap<String, bool>,
    pub addon_installed: bool,
    pub supports_server_side_roots: bool,
    pub issues_token: Option<String>,
}

struct Shared {
    fixture: FakeRemoteFixture,
    fault: Option<RemoteError>,
    registered_roots: Vec<String>,
    revoked: bool,
}

pub struct FakeRemoteClient {
    server_url: String,
    repository: String,
    base_folder: Option<String>,
    shared: Arc<Mutex<Shared>>,
}

impl FakeRemoteClient {
    fn take_fault(&self) -> Result<()> {
        let mut shared = self.shared.lock();
        if let Some(fault) = shared.fault.take() {
            return Err(fault);
        }
        Ok(())
    }

    pub fn was_token_revoked(&self) -> bool {
        self.shared.lock().revoked
    }

    pub fn registered_roots(&self) -> Vec<String> {
        self.shared.lock().registered_roots.clone()
    }
}

impl RemoteClient for FakeRemoteClient {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn repository(&self) -> &str {
        &self.repository
    }

    fn request_token(&self) -> Result<Option<String>> {
        self.take_fault()?;
        Ok(self.shared.lock().fixture.issues_token.clone())
    }

    fn revoke_token(&self) -> Result<()> {
        self.take_fault()?;
        self.shared.lock().revoked = true;
        Ok(())
    }

    fn get_info(&self, path: &str, _fetch_parent_uid: bool) -> Result<RemoteInfo> {
        self.take_fault()?;
        let key = match &self.base_folder {
            Some(base) => format!("{base}{path}"),
            None => path.to_string(),
        };
        self.shared
            .lock()
            .fixture
            .infos
            .get(&key)
            .cloned()
            .ok_or_else(|| RemoteError::Core(CoreError::NoSuchRemoteRoot(key)))
    }

    fn check_writable(&self, path: &str) -> Result<bool> {
        self.take_fault()?;
        Ok(self.shared.lock().fixture.writable.get(path).copied().unwrap_or(false))
    }

    fn is_addon_installed(&self) -> Result<bool> {
        self.take_fault()?;
        Ok(self.shared.lock().fixture.addon_installed)
    }

    fn register_as_root(&self, uid: &str) -> Result<bool> {
        self.take_fault()?;
        let mut shared = self.shared.lock();
        let supports = shared.fixture.supports_server_side_roots;
        if supports {
            shared.registered_roots.push(uid.to_string());
        }
        Ok(supports)
    }

    fn unregister_as_root(&self, uid: &str) -> Result<()> {
        self.take_fault()?;
        self.shared.lock().registered_roots.retain(|r| r != uid);
        Ok(())
    }

    fn inject_fault(&self, fault: Option<RemoteError>) {
        self.shared.lock().fault = fault;
    }
}

/// Builds [`FakeRemoteClient`]s backed by a single shared fixture, so every
/// client constructed from the same factory instance sees the same
/// documents regardless of cache hits/misses.
pub struct FakeRemoteClientFactory {
    shared: Arc<Mutex<Shared>>,
}

impl FakeRemoteClientFactory {
    pub fn new(fixture: FakeRemoteFixture) -> Self {
        Self { shared: Arc::new(Mutex::new(Shared { fixture, fault: None, registered_roots: Vec::new(), revoked: false })) }
    }

    pub fn registered_roots(&self) -> Vec<String> {
        self.shared.lock().registered_roots.clone()
    }

    /// Like [`RemoteClientFactory::create`] but returns the concrete type,
    /// for tests that need to inspect fake-only state (e.g.
    /// [`FakeRemoteClient::was_token_revoked`]).
    pub fn create_concrete(
        &self,
        server_url: &str,
        base_folder: Option<&str>,
        repository: &str,
    ) -> Arc<FakeRemoteClient> {
        Arc::new(FakeRemoteClient {
            server_url: server_url.to_string(),
            repository: repository.to_string(),
            base_folder: base_folder.map(str::to_string),
            shared: Arc::clone(&self.shared),
        })
    }
}

impl RemoteClientFactory for FakeRemoteClientFactory {
    fn create(
        &self,
        server_url: &str,
        _user: &str,
        _device_id: &str,
        _credentials: &Credentials,
        base_folder: Option<&str>,
        repository: &str,
    ) -> Result<Arc<dyn RemoteClient>> {
        Ok(Arc::new(FakeRemoteClient {
            server_url: server_url.to_string(),
            repository: repository.to_string(),
            base_folder: base_folder.map(str::to_string),
            shared: Arc::clone(&self.shared),
        }))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
