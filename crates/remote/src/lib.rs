// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bindsync-remote: the remote-client interface consumed by
//! `bindsync-control` (C4/C5), the per-context client cache (C3), and a
//! fake implementation for tests.

pub mod cache;
pub mod client;
pub mod error;
pub mod fake;

pub use cache::RemoteClientCache;
pub use client::{Credentials, RemoteClient, RemoteClientFactory, RemoteInfo};
pub use error::{RemoteError, Result};
pub use fake::{FakeRemoteClient, FakeRemoteClientFactory, FakeRemoteFixture};
