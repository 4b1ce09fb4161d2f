// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error kind catalog shared by every layer of the control core.
//!
//! `store`, `remote`, and `control` each define their own error enum for
//! the failure modes specific to that layer, but every one of those enums
//! carries a [`CoreError`] variant for the kinds that cross layer
//! boundaries unchanged, so a caller can match on kind without caring
//! which layer raised it.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Path resolution found more than one matching root binding. This
    /// indicates on-disk corruption (two roots registered over
    /// overlapping paths) and is treated as fatal by callers.
    #[error("ambiguous: {0}")]
    Ambiguous(String),

    #[error("already bound: {0}")]
    AlreadyBound(String),

    #[error("no such remote root: {0}")]
    NoSuchRemoteRoot(String),

    #[error("not writable: {0}")]
    NotWritable(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("network error: {0}")]
    NetworkError(String),

    /// Raised by a fault-injection client port (see `remote::FaultPort`);
    /// surfaced identically to its real counterpart.
    #[error("injected error: {0}")]
    InjectedError(String),
}

impl CoreError {
    /// `true` for the transient-looking kinds a caller may want to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::NetworkError(_))
    }
}
