// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::AppController;
use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct StatusArgs {
    /// A server-binding folder or a path under a bound sync root.
    folder_path: PathBuf,
}

#[derive(Serialize)]
struct ChildView {
    name: String,
    state: String,
}

pub fn run(controller: &AppController, args: StatusArgs, format: OutputFormat) -> Result<(), ExitError> {
    let rows = controller.children_states(&args.folder_path)?;
    let views: Vec<ChildView> = rows.into_iter().map(|(name, state)| ChildView { name, state }).collect();
    handle_list(format, &views, "no children tracked at this path", |rows| {
        for row in rows {
            println!("{}\t{}", row.name, row.state);
        }
    })
    .map_err(|e| ExitError::new(2, e.to_string()))?;
    Ok(())
}
