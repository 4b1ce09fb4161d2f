// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The remote client surface consumed (not implemented here) by
//! `bindsync-control`. A real binary wires a concrete HTTP implementation
//! behind [`RemoteClientFactory`]; this crate only defines the interface,
//! the cache that sits in front of it (C3), and a fake for tests.

use crate::error::{RemoteError, Result};

/// Remote document metadata as returned by `get_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub uid: String,
    pub name: String,
    pub folderish: bool,
    pub parent_uid: Option<String>,
}

/// Credentials used to authenticate a [`RemoteClient`]. Mirrors
/// `ServerBinding`'s invariant: exactly one of the two is ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Password(String),
}

/// One authenticated conversation with a document-management server,
/// scoped to a repository and (optionally) a base folder. See spec §6.
pub trait RemoteClient: Send + Sync {
    fn server_url(&self) -> &str;
    fn repository(&self) -> &str;

    /// Exchanges credentials for a long-lived token. `None` means the
    /// server doesn't support token auth and the caller should keep using
    /// the password.
    fn request_token(&self) -> Result<Option<String>>;

    fn revoke_token(&self) -> Result<()>;

    fn get_info(&self, path: &str, fetch_parent_uid: bool) -> Result<RemoteInfo>;

    fn check_writable(&self, path: &str) -> Result<bool>;

    fn is_addon_installed(&self) -> Result<bool>;

    /// Returns whether the server accepted the registration (i.e.
    /// supports server-side root bookkeeping at all).
    fn register_as_root(&self, uid: &str) -> Result<bool>;

    fn unregister_as_root(&self, uid: &str) -> Result<()>;

    /// Installs (or clears, with `None`) a sticky fault that the next call
    /// to any method on this client raises verbatim. The fault-injection
    /// port named in the interfaces surface (design note 9): it lives on
    /// the client/factory, not as global state.
    fn inject_fault(&self, fault: Option<RemoteError>);
}

/// Constructs [`RemoteClient`]s. A real binary's factory opens HTTP
/// connections; `fake::FakeRemoteClientFactory` in this crate answers from
/// an in-memory fixture for tests.
pub trait RemoteClientFactory: Send + Sync {
    fn create(
        &self,
        server_url: &str,
        user: &str,
        device_id: &str,
        credentials: &Credentials,
        base_folder: Option<&str>,
        repository: &str,
    ) -> Result<std::sync::Arc<dyn RemoteClient>>;
}
