//! Rondo CLI Application
//!
//! Command-line interface for the rondo round planning tool.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use rondo_core::{params::ListRounds, SchedulerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let scheduler = SchedulerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize scheduler")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Rondo started");

    match command {
        Some(Round { command }) => {
            Cli::new(scheduler, renderer)
                .handle_round_command(command)
                .await
        }
        Some(Stop { command }) => {
            Cli::new(scheduler, renderer)
                .handle_stop_command(command)
                .await
        }
        None => {
            Cli::new(scheduler, renderer)
                .list_rounds(&ListRounds::default())
                .await
        }
    }
}
