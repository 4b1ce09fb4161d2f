// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::AppController;
use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};
use bindsync_core::LastKnownState;
use serde::Serialize;
use std::path::PathBuf;

#[derive(clap::Subcommand)]
pub enum PendingCommand {
    /// List pending (not-yet-synchronized) pair states, oldest path first.
    List {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long)]
        local_folder: Option<PathBuf>,
        /// Skip entries that last failed within this many seconds.
        #[arg(long, default_value_t = 0)]
        ignore_in_error_seconds: i64,
    },
    /// Print the single next pending pair state, if any.
    Next {
        #[arg(long)]
        local_folder: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PendingView {
    local_root: PathBuf,
    path: Option<String>,
    remote_path: Option<String>,
    state: String,
}

impl From<&LastKnownState> for PendingView {
    fn from(s: &LastKnownState) -> Self {
        Self {
            local_root: s.local_root.clone(),
            path: s.path.clone(),
            remote_path: s.remote_path.clone(),
            state: s.pair_state().as_str().to_string(),
        }
    }
}

pub fn run(controller: &AppController, command: PendingCommand, format: OutputFormat) -> Result<(), ExitError> {
    match command {
        PendingCommand::List { limit, local_folder, ignore_in_error_seconds } => {
            let states = controller.list_pending(limit, local_folder.as_deref(), ignore_in_error_seconds)?;
            let views: Vec<PendingView> = states.iter().map(PendingView::from).collect();
            handle_list(format, &views, "nothing pending", |rows| {
                for row in rows {
                    println!("{}\t{}", row.path.as_deref().unwrap_or("-"), row.state);
                }
            })
            .map_err(|e| ExitError::new(2, e.to_string()))?;
        }
        PendingCommand::Next { local_folder } => {
            let next = controller.next_pending(local_folder.as_deref())?;
            match next {
                Some(state) => println!("{}\t{}", state.path.as_deref().unwrap_or("-"), state.pair_state().as_str()),
                None => println!("nothing pending"),
            }
        }
    }
    Ok(())
}
