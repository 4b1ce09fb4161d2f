// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Controller (C4): the public control plane. One instance is shared
//! across threads; the [`bindsync_store::Store`] connection pool and the
//! [`RemoteClientCache`] are acquired per call, never held across threads
//! (see spec §5 — execution-context-local state, design note 1).

use crate::error::{ControlError, Result};
use bindsync_core::{
    normalize_local_path, normalize_server_url, safe_filename, Clock, CoreError, DeviceId, LastKnownState,
    RootBinding, ServerBinding, SideState, SystemClock,
};
use bindsync_remote::{Credentials, RemoteClientCache, RemoteClientFactory, RemoteInfo};
use bindsync_store::Store;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Injected in place of the out-of-scope synchronizer: called after a
/// server-side root (de)registration succeeds, so the caller can trigger
/// realignment (C5) with a freshly fetched remote root list. A `None` hook
/// just logs — this crate never fetches remote root lists itself, since
/// enumerating them is a synchronizer/remote-client concern outside C4.
pub trait RealignmentRequester: Send + Sync {
    fn request_realignment(&self, server_binding: &ServerBinding, repository: &str);
}

pub struct NoRealignment;
impl RealignmentRequester for NoRealignment {
    fn request_realignment(&self, server_binding: &ServerBinding, repository: &str) {
        tracing::info!(
            server_url = %server_binding.server_url,
            repository,
            "root registration changed server-side; no realignment hook attached"
        );
    }
}

/// Locates the PID of a running sync worker for the stop-signal bus (C6).
/// The real discovery mechanism (process table inspection) is platform
/// glue outside this crate's scope; this is the seam it plugs into.
pub trait RunningProcessLocator: Send + Sync {
    fn check_running(&self) -> Option<u32>;
}

pub struct NoRunningProcess;
impl RunningProcessLocator for NoRunningProcess {
    fn check_running(&self) -> Option<u32> {
        None
    }
}

/// Opens a local file with whatever the OS considers its default
/// application. Platform-specific file-opening helpers are out of this
/// crate's scope (spec §1); this is the seam a host application plugs a
/// real opener into.
pub trait FileOpener: Send + Sync {
    fn open(&self, file_path: &Path);
}

pub struct NoFileOpener;
impl FileOpener for NoFileOpener {
    fn open(&self, file_path: &Path) {
        tracing::info!(path = %file_path.display(), "no file opener attached; not launching an editor");
    }
}

fn credentials_for(binding: &ServerBinding) -> CoreError {
    CoreError::InvalidArgument(format!(
        "server binding at {} has neither a token nor a password",
        binding.local_folder.display()
    ))
}

fn pick_credentials(binding: &ServerBinding) -> std::result::Result<Credentials, CoreError> {
    if let Some(token) = &binding.remote_token {
        Ok(Credentials::Token(token.clone()))
    } else if let Some(password) = &binding.remote_password {
        Ok(Credentials::Password(password.clone()))
    } else {
        Err(credentials_for(binding))
    }
}

pub struct Controller<F: RemoteClientFactory, C: Clock = SystemClock> {
    config_folder: PathBuf,
    store: Store,
    remote_cache: Mutex<RemoteClientCache<F>>,
    device_id: DeviceId,
    clock: C,
    realignment: Box<dyn RealignmentRequester>,
    process_locator: Box<dyn RunningProcessLocator>,
    file_opener: Box<dyn FileOpener>,
}

impl<F: RemoteClientFactory> Controller<F, SystemClock> {
    pub fn open(config_folder: &Path, factory: F) -> Result<Self> {
        Self::open_with_clock(config_folder, factory, SystemClock)
    }
}

impl<F: RemoteClientFactory, C: Clock> Controller<F, C> {
    pub fn open_with_clock(config_folder: &Path, factory: F, clock: C) -> Result<Self> {
        let config_folder = normalize_local_path(&bindsync_core::expand_user(config_folder));
        let store = Store::open(&config_folder, std::env::var_os(bindsync_store::LOG_SQL_ENV_VAR).is_some())?;
        let device_id = {
            let session = store.session()?;
            bindsync_store::get_or_create_device_config(session.connection())?.device_id
        };
        Ok(Self {
            config_folder,
            store,
            remote_cache: Mutex::new(RemoteClientCache::new(factory)),
            device_id,
            clock,
            realignment: Box::new(NoRealignment),
            process_locator: Box::new(NoRunningProcess),
            file_opener: Box::new(NoFileOpener),
        })
    }

    pub fn with_realignment_requester(mut self, hook: Box<dyn RealignmentRequester>) -> Self {
        self.realignment = hook;
        self
    }

    pub fn with_process_locator(mut self, locator: Box<dyn RunningProcessLocator>) -> Self {
        self.process_locator = locator;
        self
    }

    pub fn with_file_opener(mut self, opener: Box<dyn FileOpener>) -> Self {
        self.file_opener = opener;
        self
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Accessor for sibling modules in this crate (`alignment`, `aggregator`)
    /// that need a session but aren't themselves methods on `Controller`.
    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn remote_client(
        &self,
        binding: &ServerBinding,
        base_folder: Option<&str>,
        repository: &str,
    ) -> Result<std::sync::Arc<dyn bindsync_remote::RemoteClient>> {
        let credentials = pick_credentials(binding)?;
        let mut cache = self.remote_cache.lock();
        Ok(cache.get(&binding.server_url, &binding.remote_user, self.device_id.as_str(), &credentials, base_folder, repository)?)
    }

    // ---- C4: bind/unbind server ----------------------------------------

    pub fn bind_server(
        &self,
        local_folder: &Path,
        server_url: &str,
        user: &str,
        password: &str,
    ) -> Result<ServerBinding> {
        let local_folder = normalize_local_path(&bindsync_core::expand_user(local_folder));
        let server_url = normalize_server_url(server_url)?;

        let probe_credentials = Credentials::Password(password.to_string());
        let token = {
            let mut cache = self.remote_cache.lock();
            let client = cache.get(&server_url, user, self.device_id.as_str(), &probe_credentials, None, "default")?;
            client.request_token()?
        };

        let mut session = self.store.session()?;
        let tx = session.begin()?;
        let existing = bindsync_store::find_server_binding(&tx, &local_folder)?;

        let binding = match existing {
            Some(existing) if existing.server_url != server_url || existing.remote_user != user => {
                return Err(ControlError::Core(CoreError::AlreadyBound(format!(
                    "{} is already bound to {} as {}",
                    local_folder.display(),
                    existing.server_url,
                    existing.remote_user
                ))));
            }
            Some(mut existing) => {
                if let Some(token) = &token {
                    existing.remote_token = Some(token.clone());
                    existing.remote_password = None;
                } else {
                    existing.remote_password = Some(password.to_string());
                }
                existing
            }
            None => {
                let mut binding = ServerBinding::new(local_folder.clone(), server_url.clone(), user.to_string());
                if let Some(token) = &token {
                    binding.remote_token = Some(token.clone());
                } else {
                    binding.remote_password = Some(password.to_string());
                }
                binding
            }
        };

        bindsync_store::upsert_server_binding(&tx, &binding)?;
        std::fs::create_dir_all(&local_folder)?;
        tx.commit().map_err(bindsync_store::StoreError::from)?;
        Ok(binding)
    }

    pub fn unbind_server(&self, local_folder: &Path) -> Result<()> {
        let local_folder = normalize_local_path(&bindsync_core::expand_user(local_folder));
        let mut session = self.store.session()?;
        let tx = session.begin()?;
        let binding = bindsync_store::find_server_binding(&tx, &local_folder)?
            .ok_or_else(|| CoreError::NotFound(format!("no server binding at {}", local_folder.display())))?;

        let mut cache = self.remote_cache.lock();
        if let Some(token) = &binding.remote_token {
            let credentials = Credentials::Token(token.clone());
            match cache.get(&binding.server_url, &binding.remote_user, self.device_id.as_str(), &credentials, None, "default") {
                Ok(client) => match client.revoke_token() {
                    Ok(()) => {}
                    Err(e) if e.is_retryable() => {
                        tracing::warn!(server_url = %binding.server_url, error = %e, "could not reach server to revoke token");
                    }
                    Err(bindsync_remote::RemoteError::Core(CoreError::Unauthorized(_))) => {
                        tracing::warn!(server_url = %binding.server_url, "token already revoked");
                    }
                    Err(e) => return Err(e.into()),
                },
                Err(e) => return Err(e.into()),
            }
        }
        // Unconditional, matching the source: a client may have been
        // cached for this server even without a token to revoke.
        cache.invalidate(&binding.server_url);

        bindsync_store::delete_server_binding(&tx, &local_folder)?;
        tx.commit().map_err(bindsync_store::StoreError::from)?;
        Ok(())
    }

    /// Supplemented from the original controller: unbind every server
    /// binding, best-effort per binding (used by integration-test cleanup).
    pub fn unbind_all(&self) -> Result<()> {
        let bindings = {
            let session = self.store.session()?;
            bindsync_store::list_server_bindings(session.connection())?
        };
        for binding in bindings {
            self.unbind_server(&binding.local_folder)?;
        }
        Ok(())
    }

    // ---- C4: bind/unbind root --------------------------------------------

    pub fn bind_root(&self, local_folder: &Path, remote_root: &str, repository: &str) -> Result<RootBinding> {
        let local_folder = normalize_local_path(&bindsync_core::expand_user(local_folder));
        let server_binding = {
            let session = self.store.session()?;
            bindsync_store::find_server_binding(session.connection(), &local_folder)?
                .ok_or_else(|| CoreError::NotFound(format!("{} is not bound to any server", local_folder.display())))?
        };

        let client = self.remote_client(&server_binding, Some(remote_root), repository)?;
        let remote_info = client
            .get_info("/", false)
            .map_err(|e| match e {
                bindsync_remote::RemoteError::Core(CoreError::NoSuchRemoteRoot(m)) => ControlError::Core(CoreError::NoSuchRemoteRoot(m)),
                other => other.into(),
            })?;
        if !remote_info.folderish {
            return Err(ControlError::Core(CoreError::NoSuchRemoteRoot(format!(
                "{repository}:{remote_root} is not a folder"
            ))));
        }
        if !client.check_writable(remote_root)? {
            return Err(ControlError::Core(CoreError::NotWritable(format!(
                "{repository}:{remote_root} is not writable by {}",
                server_binding.remote_user
            ))));
        }

        if client.register_as_root(&remote_info.uid)? {
            self.realignment.request_realignment(&server_binding, repository);
            // The server now owns root bookkeeping; a RootBinding row only
            // appears once the synchronizer's realignment pass runs.
            bindsync_store::find_root_binding(
                self.store.session()?.connection(),
                &local_folder.join(safe_filename(&remote_info.name)),
            )?
            .ok_or_else(|| {
                ControlError::Core(CoreError::NotFound(
                    "root registered server-side; awaiting realignment".to_string(),
                ))
            })
        } else {
            self.local_bind_root(&server_binding, &remote_info, repository)
        }
    }

    /// `_local_bind_root`: idempotent local-only root binding, used when the
    /// server has no concept of server-side root registration. Also the
    /// primitive root alignment (C5, `alignment.rs`) builds on to add a
    /// root discovered remotely but missing locally.
    pub(crate) fn local_bind_root(
        &self,
        server_binding: &ServerBinding,
        remote_info: &RemoteInfo,
        repository: &str,
    ) -> Result<RootBinding> {
        let local_root = server_binding.local_folder.join(safe_filename(&remote_info.name));
        std::fs::create_dir_all(&local_root)?;

        let mut session = self.store.session()?;
        let tx = session.begin()?;
        if let Some(existing) = bindsync_store::find_root_binding(&tx, &local_root)? {
            if existing.remote_repo != repository || existing.remote_root != remote_info.uid {
                return Err(ControlError::Core(CoreError::AlreadyBound(format!(
                    "{} is already bound to {}:{}",
                    local_root.display(),
                    existing.remote_repo,
                    existing.remote_root
                ))));
            }
            return Ok(existing);
        }

        let binding = RootBinding {
            local_root: local_root.clone(),
            server_binding_folder: server_binding.local_folder.clone(),
            remote_repo: repository.to_string(),
            remote_root: remote_info.uid.clone(),
        };
        bindsync_store::insert_root_binding(&tx, &binding)?;

        let (local_state, remote_state) =
            if remote_info.folderish { (SideState::Synchronized, SideState::Synchronized) } else { (SideState::Synchronized, SideState::Modified) };
        let seed = LastKnownState {
            local_folder: server_binding.local_folder.clone(),
            local_root: local_root.clone(),
            path: Some("/".to_string()),
            parent_path: None,
            local_name: Some(remote_info.name.clone()),
            remote_ref: Some(remote_info.uid.clone()),
            remote_parent_ref: remote_info.parent_uid.clone(),
            remote_name: Some(remote_info.name.clone()),
            remote_path: Some("/".to_string()),
            folderish: remote_info.folderish,
            local_state,
            remote_state,
            last_sync_error_date: None,
        };
        bindsync_store::upsert_state(&tx, &seed)?;
        tx.commit().map_err(bindsync_store::StoreError::from)?;
        Ok(binding)
    }

    pub fn unbind_root(&self, local_root: &Path) -> Result<()> {
        let local_root = normalize_local_path(&bindsync_core::expand_user(local_root));
        let (binding, server_binding) = {
            let session = self.store.session()?;
            let binding = bindsync_store::find_root_binding(session.connection(), &local_root)?
                .ok_or_else(|| CoreError::NotFound(format!("{} is not a bound root", local_root.display())))?;
            let server_binding = bindsync_store::find_server_binding(session.connection(), &binding.server_binding_folder)?
                .ok_or_else(|| CoreError::NotFound(format!("owning server binding for {} is missing", local_root.display())))?;
            (binding, server_binding)
        };

        let client = self.remote_client(&server_binding, Some(&binding.remote_root), &binding.remote_repo)?;
        if client.is_addon_installed()? {
            client.unregister_as_root(&binding.remote_root)?;
            self.realignment.request_realignment(&server_binding, &binding.remote_repo);
        } else {
            let mut session = self.store.session()?;
            let tx = session.begin()?;
            bindsync_store::delete_root_binding(&tx, &local_root)?;
            tx.commit().map_err(bindsync_store::StoreError::from)?;
        }
        Ok(())
    }

    // ---- C4: pending-work queries -----------------------------------------

    pub fn list_pending(
        &self,
        limit: u32,
        local_folder: Option<&Path>,
        ignore_in_error_seconds: i64,
    ) -> Result<Vec<LastKnownState>> {
        let session = self.store.session()?;
        Ok(bindsync_store::list_pending(
            session.connection(),
            limit,
            local_folder,
            ignore_in_error_seconds,
            self.clock.now(),
        )?)
    }

    pub fn next_pending(&self, local_folder: Option<&Path>) -> Result<Option<LastKnownState>> {
        Ok(self.list_pending(1, local_folder, 0)?.into_iter().next())
    }

    pub fn get_state(&self, server_url: &str, repo: &str, remote_ref: &str) -> Result<Option<LastKnownState>> {
        let server_url = normalize_server_url(server_url)?;
        let session = self.store.session()?;
        for state in bindsync_store::find_all_by_remote_ref(session.connection(), remote_ref)? {
            if let Some(root) = bindsync_store::find_root_binding(session.connection(), &state.local_root)? {
                if root.remote_repo != repo {
                    continue;
                }
                if let Some(server) = bindsync_store::find_server_binding(session.connection(), &root.server_binding_folder)? {
                    if server.server_url == server_url {
                        return Ok(Some(state));
                    }
                }
            }
        }
        Ok(None)
    }

    pub fn get_state_for_local_path(&self, abs_path: &Path) -> Result<LastKnownState> {
        let abs_path = normalize_local_path(&bindsync_core::expand_user(abs_path));
        let session = self.store.session()?;
        let (root, relative) = bindsync_store::resolve_path(session.connection(), &abs_path)?;
        bindsync_store::find_by_path(session.connection(), &root.local_root, &relative)?
            .ok_or_else(|| ControlError::Core(CoreError::NotFound(format!("no pair state at {}", abs_path.display()))))
    }

    // ---- C6: stop-signal bus ----------------------------------------------

    pub fn stop(&self) -> Result<()> {
        match self.process_locator.check_running() {
            Some(pid) => {
                tracing::info!(pid, "telling synchronization process to stop");
                let marker = self.config_folder.join(format!("stop_{pid}"));
                std::fs::File::create(marker)?;
            }
            None => tracing::info!("no running synchronization process to stop"),
        }
        Ok(())
    }

    /// Supplemented from the original controller: best-effort local file
    /// opener, used by `launch_file_editor`. The actual OS launch is
    /// platform-specific glue out of this crate's scope (spec §1); this
    /// hands off to the injected `FileOpener` (spec §7: best-effort
    /// local editor launch).
    pub fn open_local_file(&self, file_path: &Path) {
        tracing::debug!(path = %file_path.display(), "launching editor");
        self.file_opener.open(file_path);
    }

    /// Supplemented from the original controller: find the local file for
    /// a remote document and open it, logging (not failing) when there is
    /// no local copy yet.
    pub fn launch_file_editor(&self, server_url: &str, repo: &str, remote_ref: &str) -> Result<()> {
        let Some(state) = self.get_state(server_url, repo, remote_ref)? else {
            tracing::warn!(server_url, repo, remote_ref, "could not find local file for remote document");
            return Ok(());
        };
        let relative = state.path.as_deref().unwrap_or("/");
        let local_path = local_abspath(&state.local_root, relative);
        self.open_local_file(&local_path);
        Ok(())
    }

    pub fn dispose(self) {
        self.store.dispose();
    }
}

/// Joins a root-relative `/`-separated path back onto its local root using
/// the OS-native separator.
pub(crate) fn local_abspath(local_root: &Path, root_relative_path: &str) -> PathBuf {
    let mut path = local_root.to_path_buf();
    for segment in root_relative_path.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
