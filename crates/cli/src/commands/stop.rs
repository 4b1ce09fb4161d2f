// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::AppController;
use crate::exit_error::ExitError;

pub fn run(controller: &AppController) -> Result<(), ExitError> {
    controller.stop()?;
    println!("stop signal sent");
    Ok(())
}
