// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persistent data model: device config, the binding hierarchy, and
//! the pair-state record that unifies a document's local and remote view.

use crate::id::DeviceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Singleton per installation. Created on first [`crate::Store`] open if
/// absent; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_id: DeviceId,
}

/// One local folder bound to a remote server, under one account.
///
/// Invariant: exactly one of `remote_password` / `remote_token` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerBinding {
    pub local_folder: PathBuf,
    pub server_url: String,
    pub remote_user: String,
    pub remote_password: Option<String>,
    pub remote_token: Option<String>,
}

impl ServerBinding {
    pub fn new(local_folder: PathBuf, server_url: String, remote_user: String) -> Self {
        Self { local_folder, server_url, remote_user, remote_password: None, remote_token: None }
    }

    /// Invariant 4: never both a password and a token.
    pub fn has_consistent_credentials(&self) -> bool {
        !(self.remote_password.is_some() && self.remote_token.is_some())
    }
}

/// One local root folder under a [`ServerBinding`], mirroring one
/// folderish remote document.
///
/// Invariant: `local_root` is a strict path-prefix descendant of its
/// server binding's `local_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBinding {
    pub local_root: PathBuf,
    pub server_binding_folder: PathBuf,
    pub remote_repo: String,
    pub remote_root: String,
}

/// Local/remote half-states that combine into a [`PairState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideState {
    Unknown,
    Synchronized,
    Created,
    Modified,
    Deleted,
}

impl SideState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideState::Unknown => "unknown",
            SideState::Synchronized => "synchronized",
            SideState::Created => "created",
            SideState::Modified => "modified",
            SideState::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "synchronized" => SideState::Synchronized,
            "created" => SideState::Created,
            "modified" => SideState::Modified,
            "deleted" => SideState::Deleted,
            _ => SideState::Unknown,
        }
    }
}

/// The derived, combined status of a [`LastKnownState`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairState {
    Synchronized,
    LocallyModified,
    RemotelyModified,
    Conflicted,
    LocallyCreated,
    RemotelyCreated,
    LocallyDeleted,
    RemotelyDeleted,
    Unknown,
}

impl PairState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairState::Synchronized => "synchronized",
            PairState::LocallyModified => "locally_modified",
            PairState::RemotelyModified => "remotely_modified",
            PairState::Conflicted => "conflicted",
            PairState::LocallyCreated => "locally_created",
            PairState::RemotelyCreated => "remotely_created",
            PairState::LocallyDeleted => "locally_deleted",
            PairState::RemotelyDeleted => "remotely_deleted",
            PairState::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "synchronized" => PairState::Synchronized,
            "locally_modified" => PairState::LocallyModified,
            "remotely_modified" => PairState::RemotelyModified,
            "conflicted" => PairState::Conflicted,
            "locally_created" => PairState::LocallyCreated,
            "remotely_created" => PairState::RemotelyCreated,
            "locally_deleted" => PairState::LocallyDeleted,
            "remotely_deleted" => PairState::RemotelyDeleted,
            _ => PairState::Unknown,
        }
    }

    /// Derives the combined pair state from the two side states.
    ///
    /// Deletion on either side dominates (the synchronizer still needs to
    /// reconcile it even if the other side also changed), then a mismatch
    /// between two non-trivial states is a conflict, then a lone change on
    /// one side is that side's state, then "both synchronized" wins, and
    /// anything else (e.g. both unknown) is `unknown`.
    pub fn derive(local: SideState, remote: SideState) -> PairState {
        use SideState::*;
        match (local, remote) {
            (Deleted, _) => PairState::LocallyDeleted,
            (_, Deleted) => PairState::RemotelyDeleted,
            (Synchronized, Synchronized) => PairState::Synchronized,
            (Created, Unknown) | (Created, Synchronized) => PairState::LocallyCreated,
            (Unknown, Created) | (Synchronized, Created) => PairState::RemotelyCreated,
            (Modified, Synchronized) | (Modified, Unknown) => PairState::LocallyModified,
            (Synchronized, Modified) | (Unknown, Modified) => PairState::RemotelyModified,
            (Modified, Modified)
            | (Created, Created)
            | (Created, Modified)
            | (Modified, Created) => PairState::Conflicted,
            _ => PairState::Unknown,
        }
    }
}

/// One record unifying the local and remote views of a logical document.
///
/// Invariant: at least one of `path` / `remote_ref` is non-null at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastKnownState {
    pub local_folder: PathBuf,
    pub local_root: PathBuf,
    pub path: Option<String>,
    pub parent_path: Option<String>,
    pub local_name: Option<String>,
    pub remote_ref: Option<String>,
    pub remote_parent_ref: Option<String>,
    pub remote_name: Option<String>,
    pub remote_path: Option<String>,
    pub folderish: bool,
    pub local_state: SideState,
    pub remote_state: SideState,
    pub last_sync_error_date: Option<DateTime<Utc>>,
}

impl LastKnownState {
    pub fn pair_state(&self) -> PairState {
        PairState::derive(self.local_state, self.remote_state)
    }

    /// Invariant 3.
    pub fn has_a_side(&self) -> bool {
        self.path.is_some() || self.remote_ref.is_some()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
