use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{RoundCommands, StopCommands};

/// Main command-line interface for the Rondo round planning tool
///
/// Rondo manages a home-care practice's daily rounds: ordered sets of
/// patient visits with a Planned → Started → Completed lifecycle, route
/// optimization against a travel cost table, and itinerary building for
/// navigation handoff.
#[derive(Parser)]
#[command(version, about, name = "rondo")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/rondo/rondo.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Rondo CLI
///
/// The CLI is organized into two command categories:
/// - `round`: Operations on whole rounds (create, start, optimize, etc.)
/// - `stop`: Operations on individual stops within a round
#[derive(Subcommand)]
pub enum Commands {
    /// Manage rounds
    #[command(alias = "r")]
    Round {
        #[command(subcommand)]
        command: RoundCommands,
    },
    /// Manage stops within rounds
    #[command(alias = "s")]
    Stop {
        #[command(subcommand)]
        command: StopCommands,
    },
}
