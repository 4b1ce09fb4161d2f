// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bindsync-store: the durable relational Store (C1), the binding
//! registry (C2), and pair-state persistence that sits under every
//! query `bindsync-control` needs.
//!
//! Every write goes through an explicit [`Session::begin`] transaction;
//! commit and rollback are always the caller's decision, never implicit.

pub mod bindings;
pub mod device;
pub mod error;
pub mod pair_state;
pub mod pool;
pub mod schema;

pub use bindings::{
    delete_root_binding, delete_server_binding, find_root_binding, find_server_binding,
    insert_root_binding, list_root_bindings_for_server, list_server_bindings, resolve_path,
    upsert_server_binding,
};
pub use device::get_or_create_device_config;
pub use error::{Result, StoreError};
pub use pair_state::{
    all_descendants_synchronized, delete_state, find_all_by_remote_ref, find_by_path, list_children,
    list_pending, upsert_state,
};
pub use pool::{Session, Store, DB_FILE_NAME, LOG_SQL_ENV_VAR};
