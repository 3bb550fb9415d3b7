//! Core library for the Rondo round scheduling application.
//!
//! This crate provides the business logic of a home-care practice's round
//! planning: rounds (a caregiver's ordered set of home-visit stops for one
//! day), their Planned → Started → Completed lifecycle, the persistent
//! round store, deterministic route optimization, and itinerary building.
//!
//! # Architecture
//!
//! - **Domain Models** ([`models`]): rounds, stops, statuses, summaries,
//!   and the domain events emitted on lifecycle transitions
//! - **Round Store** ([`db`]): single-writer SQLite store; every mutation
//!   is one transaction, so no caller ever observes a half-updated round
//! - **Scheduler** ([`scheduler`]): the lifecycle controller and the only
//!   writer of round data; enforces the state machine and emits events
//! - **Routing** ([`routing`]): pure route optimization over an external
//!   cost provider, and waypoint itinerary building
//! - **Display** ([`display`]): markdown formatting wrappers shared by
//!   all interfaces
//!
//! External collaborators (patient records, distance providers, mapping,
//! care-sheet generation) sit behind narrow traits; the core never talks
//! to a network itself.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rondo_core::{params::{AddStop, CreateRound, Id}, SchedulerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("rounds.db"))
//!     .build()
//!     .await?;
//!
//! let round = scheduler
//!     .create_round(&CreateRound {
//!         name: "Morning east side".to_string(),
//!         date: "2026-08-06".to_string(),
//!     })
//!     .await?;
//!
//! scheduler
//!     .add_stop(&AddStop {
//!         round_id: round.id,
//!         patient_name: "Jo Miller".to_string(),
//!         patient_address: "12 Elm Street".to_string(),
//!         scheduled_time: "08:30".to_string(),
//!         care_label: "Wound care".to_string(),
//!     })
//!     .await?;
//!
//! let started = scheduler.start_round(&Id { id: round.id }).await?;
//! println!("{}", started);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod directory;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod routing;
pub mod scheduler;

// Re-export commonly used types
pub use db::Database;
pub use directory::{PatientDirectory, PatientRecord, StaticDirectory};
pub use display::{CreateResult, DeleteResult, OperationStatus, RoundSummaries, Stops};
pub use error::{Result, RoundsError};
pub use models::{Round, RoundEvent, RoundFilter, RoundStatus, RoundSummary, Stop};
pub use routing::{
    build_itinerary, optimize, CostProvider, Itinerary, Leg, OptimizedRoute, TableCostProvider,
};
pub use scheduler::{spawn_care_sheet_worker, CareSheetGenerator, Scheduler, SchedulerBuilder};
