// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-layer error type.

use bindsync_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A transport-level I/O failure, below any auth/data semantics a
    /// concrete `RemoteClient` implementation understands — e.g. a
    /// connection reset reported by the underlying HTTP stack. Kept
    /// distinct from `CoreError::NetworkError` (a domain-level retry
    /// signal every layer can match on) because this one carries no kind
    /// of its own, only the transport's message.
    #[error("io error: {0}")]
    Io(String),
}

impl RemoteError {
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Core(e) => e.is_retryable(),
            RemoteError::Io(_) => true,
        }
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;
