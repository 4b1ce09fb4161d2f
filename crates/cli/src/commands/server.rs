// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::AppController;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;

#[derive(clap::Subcommand)]
pub enum ServerCommand {
    /// Bind a local folder to a remote server under an account.
    Bind {
        local_folder: PathBuf,
        server_url: String,
        user: String,
        #[arg(long, env = "BINDSYNC_PASSWORD")]
        password: String,
    },
    /// Revoke the server's token (if any) and forget a local folder's binding.
    Unbind { local_folder: PathBuf },
    /// Unbind every server binding known to this installation.
    UnbindAll,
}

#[derive(Serialize)]
struct ServerBindingView {
    local_folder: PathBuf,
    server_url: String,
    remote_user: String,
}

pub fn run(controller: &AppController, command: ServerCommand, format: OutputFormat) -> Result<(), ExitError> {
    match command {
        ServerCommand::Bind { local_folder, server_url, user, password } => {
            let binding = controller.bind_server(&local_folder, &server_url, &user, &password)?;
            format_or_json(
                format,
                &ServerBindingView {
                    local_folder: binding.local_folder.clone(),
                    server_url: binding.server_url.clone(),
                    remote_user: binding.remote_user.clone(),
                },
                || println!("bound {} to {} as {}", binding.local_folder.display(), binding.server_url, binding.remote_user),
            )
            .map_err(|e| ExitError::new(2, e.to_string()))?;
        }
        ServerCommand::Unbind { local_folder } => {
            controller.unbind_server(&local_folder)?;
            println!("unbound {}", local_folder.display());
        }
        ServerCommand::UnbindAll => {
            controller.unbind_all()?;
            println!("unbound every server binding");
        }
    }
    Ok(())
}
