// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane error type: the union of everything a layer below the
//! Controller can raise, plus the kinds the spec attributes to the
//! Controller itself (`AlreadyBound`, `NoSuchRemoteRoot`, `NotWritable`).

use bindsync_core::CoreError;
use bindsync_remote::RemoteError;
use bindsync_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ControlError>;
