//! Command-line interface definitions and handlers using clap
//!
//! This module defines the `round` and `stop` subcommand trees with
//! clap's derive API and the [`Cli`] handler that executes them against
//! the scheduler, rendering the core's Display output through the
//! terminal renderer.
//!
//! CLI argument structs wrap the core parameter types: clap-specific
//! attributes (flags, help text, defaults) stay here, conversion into
//! `rondo_core::params` types is explicit, and domain validation remains
//! in the core.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use jiff::Zoned;
use rondo_core::{
    display::{CreateResult, DeleteResult, OperationStatus},
    params::{AddStop, CreateRound, DeleteRound, Id, ListRounds, StopRef},
    RoundsError, Scheduler, TableCostProvider,
};
use serde::Deserialize;

use crate::renderer::TerminalRenderer;

/// Round management subcommands
#[derive(Subcommand)]
pub enum RoundCommands {
    /// Create a new round
    Create(CreateRoundArgs),
    /// List rounds, optionally filtered by date or status
    List(ListRoundsArgs),
    /// Show a round with all its stops
    Show {
        /// ID of the round to show
        id: u64,
    },
    /// Start a planned round
    Start {
        /// ID of the round to start
        id: u64,
    },
    /// Complete a started round, marking all remaining stops done
    Complete {
        /// ID of the round to complete
        id: u64,
    },
    /// Permanently delete a round and its stops
    Delete(DeleteRoundArgs),
    /// Optimize a round's travel order against a cost table
    Optimize(OptimizeArgs),
    /// Print the navigation itinerary for a round's current stop order
    Itinerary {
        /// ID of the round
        id: u64,
    },
}

/// Stop management subcommands
#[derive(Subcommand)]
pub enum StopCommands {
    /// Add a stop to a planned round
    Add(AddStopArgs),
    /// Remove a stop from a planned round
    Remove {
        /// ID of the round
        round_id: u64,
        /// ID of the stop to remove
        stop_id: u64,
    },
    /// Mark a stop of a started round as completed
    Complete {
        /// ID of the round
        round_id: u64,
        /// ID of the stop to complete
        stop_id: u64,
    },
    /// Revert a completed stop to pending
    Reactivate {
        /// ID of the round
        round_id: u64,
        /// ID of the stop to reactivate
        stop_id: u64,
    },
    /// List the stops of a round in travel order
    List {
        /// ID of the round
        round_id: u64,
    },
}

/// Create a new round
#[derive(Args)]
pub struct CreateRoundArgs {
    /// Name of the round
    pub name: String,
    /// Day of the round (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

impl From<CreateRoundArgs> for CreateRound {
    fn from(val: CreateRoundArgs) -> Self {
        CreateRound {
            name: val.name,
            date: val
                .date
                .unwrap_or_else(|| Zoned::now().date().to_string()),
        }
    }
}

/// List rounds
#[derive(Args)]
pub struct ListRoundsArgs {
    /// Only rounds on this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Only rounds in this state (planned, started, completed)
    #[arg(long)]
    pub status: Option<String>,
}

impl From<ListRoundsArgs> for ListRounds {
    fn from(val: ListRoundsArgs) -> Self {
        ListRounds {
            date: val.date,
            status: val.status,
        }
    }
}

/// Delete a round
#[derive(Args)]
pub struct DeleteRoundArgs {
    /// ID of the round to delete
    pub id: u64,
    /// Confirm the permanent deletion
    #[arg(long)]
    pub yes: bool,
}

/// Optimize a round's travel order
#[derive(Args)]
pub struct OptimizeArgs {
    /// ID of the round to optimize
    pub id: u64,
    /// Path to a JSON cost table with entries
    /// {"from", "to", "distance_km", "duration_minutes"}
    #[arg(long)]
    pub costs: PathBuf,
    /// Persist the optimized order to the round
    #[arg(long)]
    pub apply: bool,
    /// Give up and keep the current order after this many seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

/// Add a stop to a round
#[derive(Args)]
pub struct AddStopArgs {
    /// ID of the round to add the stop to
    pub round_id: u64,
    /// Patient name to snapshot into the stop
    #[arg(long)]
    pub patient: String,
    /// Patient address to snapshot into the stop
    #[arg(long)]
    pub address: String,
    /// Visit time (HH:MM)
    #[arg(long)]
    pub time: String,
    /// Description of the care to perform
    #[arg(long)]
    pub care: String,
}

impl From<AddStopArgs> for AddStop {
    fn from(val: AddStopArgs) -> Self {
        AddStop {
            round_id: val.round_id,
            patient_name: val.patient,
            patient_address: val.address,
            scheduled_time: val.time,
            care_label: val.care,
        }
    }
}

/// One entry of a JSON cost table file.
#[derive(Deserialize)]
struct CostEntry {
    from: String,
    to: String,
    distance_km: f64,
    duration_minutes: f64,
}

/// Loads a symmetric cost table from a JSON file.
fn load_cost_table(path: &Path) -> Result<TableCostProvider> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cost table {}", path.display()))?;
    let entries: Vec<CostEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse cost table {}", path.display()))?;

    let mut provider = TableCostProvider::new();
    for entry in entries {
        provider.insert(entry.from, entry.to, entry.distance_km, entry.duration_minutes);
    }
    Ok(provider)
}

/// Command executor wiring the scheduler to the terminal renderer.
pub struct Cli {
    scheduler: Scheduler,
    renderer: TerminalRenderer,
}

impl Cli {
    /// Create a new CLI handler.
    pub fn new(scheduler: Scheduler, renderer: TerminalRenderer) -> Self {
        Self {
            scheduler,
            renderer,
        }
    }

    /// Execute a round subcommand.
    pub async fn handle_round_command(&self, command: RoundCommands) -> Result<()> {
        match command {
            RoundCommands::Create(args) => {
                let round = self.scheduler.create_round(&args.into()).await?;
                self.renderer.render(&CreateResult::new(round).to_string())
            }
            RoundCommands::List(args) => self.list_rounds(&args.into()).await,
            RoundCommands::Show { id } => match self.scheduler.show_round(&Id { id }).await? {
                Some(round) => self.renderer.render(&round.to_string()),
                None => self.render_not_found(id),
            },
            RoundCommands::Start { id } => {
                let round = self.scheduler.start_round(&Id { id }).await?;
                self.renderer.render(&round.to_string())
            }
            RoundCommands::Complete { id } => {
                let round = self.scheduler.complete_round(&Id { id }).await?;
                self.renderer.render(&round.to_string())
            }
            RoundCommands::Delete(args) => {
                let params = DeleteRound {
                    id: args.id,
                    confirmed: args.yes,
                };
                match self.scheduler.delete_round(&params).await? {
                    Some(round) => self.renderer.render(&DeleteResult::new(round).to_string()),
                    None => self.render_not_found(args.id),
                }
            }
            RoundCommands::Optimize(args) => self.optimize_round(args).await,
            RoundCommands::Itinerary { id } => {
                let itinerary = self.scheduler.itinerary(&Id { id }).await?;
                self.renderer.render(&itinerary.to_string())
            }
        }
    }

    /// Execute a stop subcommand.
    pub async fn handle_stop_command(&self, command: StopCommands) -> Result<()> {
        match command {
            StopCommands::Add(args) => {
                let stop = self.scheduler.add_stop(&args.into()).await?;
                self.renderer.render(&CreateResult::new(stop).to_string())
            }
            StopCommands::Remove { round_id, stop_id } => {
                self.scheduler
                    .remove_stop(&StopRef { round_id, stop_id })
                    .await?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Removed stop {stop_id} from round {round_id}"
                    ))
                    .to_string(),
                )
            }
            StopCommands::Complete { round_id, stop_id } => {
                let round = self
                    .scheduler
                    .complete_stop(&StopRef { round_id, stop_id })
                    .await?;
                self.renderer.render(&round.to_string())
            }
            StopCommands::Reactivate { round_id, stop_id } => {
                let round = self
                    .scheduler
                    .reactivate_stop(&StopRef { round_id, stop_id })
                    .await?;
                self.renderer.render(&round.to_string())
            }
            StopCommands::List { round_id } => {
                let stops = self.scheduler.get_stops(&Id { id: round_id }).await?;
                self.renderer.render(&stops.to_string())
            }
        }
    }

    /// List rounds as summaries.
    pub async fn list_rounds(&self, params: &ListRounds) -> Result<()> {
        let summaries = self.scheduler.list_rounds_summary(params).await?;
        self.renderer.render(&summaries.to_string())
    }

    /// Run route optimization, degrading to the current order when the
    /// provider is unavailable or the deadline expires.
    async fn optimize_round(&self, args: OptimizeArgs) -> Result<()> {
        let provider = Arc::new(load_cost_table(&args.costs)?);
        let deadline = Some(Duration::from_secs(args.timeout_secs));
        let id = Id { id: args.id };

        match self.scheduler.optimize_round(&id, provider, deadline).await {
            Ok(optimized) => {
                if args.apply && optimized.improved() {
                    self.scheduler.apply_optimization(&id, &optimized).await?;
                }
                self.renderer.render(&optimized.to_string())
            }
            Err(RoundsError::ProviderUnavailable { reason }) => {
                // Optimization is best-effort; show the unchanged order
                self.renderer.render(
                    &OperationStatus::failure(format!(
                        "Route optimization unavailable ({reason}); keeping the current order"
                    ))
                    .to_string(),
                )?;
                let stops = self.scheduler.get_stops(&id).await?;
                self.renderer.render(&stops.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn render_not_found(&self, id: u64) -> Result<()> {
        self.renderer
            .render(&OperationStatus::failure(format!("Round {id} not found")).to_string())
    }
}
