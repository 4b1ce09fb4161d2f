// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::AppController;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;

#[derive(clap::Subcommand)]
pub enum RootCommand {
    /// Bind a remote folder as a sync root under an already-bound server folder.
    Bind {
        local_folder: PathBuf,
        remote_root: String,
        #[arg(long, default_value = "default")]
        repository: String,
    },
    /// Unregister a sync root, locally or (if the server supports it) server-side.
    Unbind { local_root: PathBuf },
}

#[derive(Serialize)]
struct RootBindingView {
    local_root: PathBuf,
    remote_repo: String,
    remote_root: String,
}

pub fn run(controller: &AppController, command: RootCommand, format: OutputFormat) -> Result<(), ExitError> {
    match command {
        RootCommand::Bind { local_folder, remote_root, repository } => {
            let binding = controller.bind_root(&local_folder, &remote_root, &repository)?;
            format_or_json(
                format,
                &RootBindingView {
                    local_root: binding.local_root.clone(),
                    remote_repo: binding.remote_repo.clone(),
                    remote_root: binding.remote_root.clone(),
                },
                || println!("bound root {} ({}:{})", binding.local_root.display(), binding.remote_repo, binding.remote_root),
            )
            .map_err(|e| ExitError::new(2, e.to_string()))?;
        }
        RootCommand::Unbind { local_root } => {
            controller.unbind_root(&local_root)?;
            println!("unbound root {}", local_root.display());
        }
    }
    Ok(())
}
