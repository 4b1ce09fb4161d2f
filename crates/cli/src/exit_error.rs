// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Maps a [`bindsync_control::ControlError`] onto an exit code per the
/// error kind catalog (spec §7): not-found/ambiguous/invalid-argument
/// class failures exit 1, everything else (I/O, store corruption) exits 2.
impl From<bindsync_control::ControlError> for ExitError {
    fn from(err: bindsync_control::ControlError) -> Self {
        use bindsync_control::ControlError;
        use bindsync_core::CoreError;
        let code = match &err {
            ControlError::Core(
                CoreError::NotFound(_)
                | CoreError::InvalidArgument(_)
                | CoreError::AlreadyBound(_)
                | CoreError::NoSuchRemoteRoot(_)
                | CoreError::NotWritable(_)
                | CoreError::Unauthorized(_)
                | CoreError::NetworkError(_)
                | CoreError::InjectedError(_),
            ) => 1,
            _ => 2,
        };
        Self::new(code, err.to_string())
    }
}
