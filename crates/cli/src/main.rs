// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod exit_error;
mod output;

use clap::Parser;
use commands::pending::PendingCommand;
use commands::root::RootCommand;
use commands::server::ServerCommand;
use commands::status::StatusArgs;
use exit_error::ExitError;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bindsync", about = "Synchronization control-core CLI")]
struct Cli {
    /// Configuration folder holding `bindsync.db` and stop markers.
    #[arg(long, env = "BINDSYNC_CONFIG_FOLDER")]
    config_folder: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Server-binding operations.
    Server {
        #[command(subcommand)]
        command: ServerCommand,
    },
    /// Sync-root operations.
    Root {
        #[command(subcommand)]
        command: RootCommand,
    },
    /// Pending-work queries.
    Pending {
        #[command(subcommand)]
        command: PendingCommand,
    },
    /// List the aggregated pair state of a folder's direct children.
    Status(StatusArgs),
    /// Signal a running synchronization process to stop.
    Stop,
}

fn default_config_folder() -> PathBuf {
    bindsync_control::default_sync_root()
        .unwrap_or_else(|| PathBuf::from("."))
        .parent()
        .map(|p| p.join(".bindsync"))
        .unwrap_or_else(|| PathBuf::from(".bindsync"))
}

fn run(cli: Cli) -> Result<(), ExitError> {
    let config_folder = cli.config_folder.unwrap_or_else(default_config_folder);
    let controller =
        commands::open_controller(&config_folder).map_err(|e| ExitError::new(2, e.to_string()))?;

    match cli.command {
        Command::Server { command } => commands::server::run(&controller, command, cli.output),
        Command::Root { command } => commands::root::run(&controller, command, cli.output),
        Command::Pending { command } => commands::pending::run(&controller, command, cli.output),
        Command::Status(args) => commands::status::run(&controller, args, cli.output),
        Command::Stop => commands::stop::run(&controller),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}
