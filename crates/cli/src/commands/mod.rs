// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations, one module per entity the Controller
//! exposes.

pub mod pending;
pub mod root;
pub mod server;
pub mod status;
pub mod stop;

use bindsync_control::Controller;
use bindsync_remote::fake::FakeRemoteClientFactory;

/// The concrete controller type every command handler operates on.
///
/// The real remote client (authenticated HTTP conversations with the
/// document server) is out of scope for the control core this CLI wraps
/// (spec §1); until a production `RemoteClientFactory` is wired in here,
/// commands run against the in-memory fake, which is enough to exercise
/// every Controller operation end to end.
pub type AppController = Controller<FakeRemoteClientFactory>;

pub fn open_controller(config_folder: &std::path::Path) -> anyhow::Result<AppController> {
    let controller = Controller::open(config_folder, FakeRemoteClientFactory::new(Default::default()))?;
    Ok(controller)
}
