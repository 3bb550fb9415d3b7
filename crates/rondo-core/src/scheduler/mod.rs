//! High-level scheduler API for managing rounds and stops.
//!
//! This module provides the main [`Scheduler`] interface of the round
//! scheduling system. The scheduler is the lifecycle controller: the only
//! component that mutates the round store, the enforcer of the
//! Planned → Started → Completed state machine, and the emitter of domain
//! events after each committed transition.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │   Round Store   │
//! │ (handlers,      │───▶│ (round_ops,     │───▶│    (via db/)    │
//! │  routing_ops)   │    │  stop_ops,      │    │                 │
//! │                 │    │  lifecycle)     │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!     Interfaces          Business Logic         Data Persistence
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Scheduler`] instances
//! - [`round_ops`]: Round CRUD operations
//! - [`stop_ops`]: Stop-set editing on planned rounds
//! - [`lifecycle`]: State-machine transitions and event emission
//! - [`handlers`]: Summary/confirmation operations returning display types
//! - [`routing_ops`]: Route optimization and itinerary orchestration
//! - [`care_sheet`]: Fire-and-forget care-sheet generation on stop
//!   completion
//!
//! ## Design Principles
//!
//! 1. **Single writer**: every mutation goes through the scheduler into
//!    one store transaction; callers never see half-updated rounds
//! 2. **Events after commit**: domain events are emitted only once the
//!    transition has been persisted, in commit order per round
//! 3. **Best-effort optimization**: routing failures degrade gracefully
//!    and never block a lifecycle transition
//!
//! # Usage
//!
//! ```rust,no_run
//! use rondo_core::{params::CreateRound, SchedulerBuilder};
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
//! println!("Created round {}", round.id);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::sync::broadcast;

use crate::models::RoundEvent;

// Module declarations
pub mod builder;
pub mod care_sheet;
pub mod handlers;
pub mod lifecycle;
pub mod round_ops;
pub mod routing_ops;
pub mod stop_ops;

#[cfg(test)]
mod tests;

// Re-export the main types
pub use builder::SchedulerBuilder;
pub use care_sheet::{spawn_care_sheet_worker, CareSheetGenerator};

/// Capacity of the domain event channel; slow consumers that lag past
/// this many events observe a `Lagged` error rather than blocking writers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Main scheduler interface for managing rounds and stops.
pub struct Scheduler {
    pub(crate) db_path: PathBuf,
    events: broadcast::Sender<RoundEvent>,
}

impl Scheduler {
    /// Creates a new scheduler with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { db_path, events }
    }

    /// Subscribes to domain events emitted after committed transitions.
    ///
    /// Delivery is at-least-once and ordered per round; consumers must be
    /// idempotent.
    pub fn subscribe(&self) -> broadcast::Receiver<RoundEvent> {
        self.events.subscribe()
    }

    /// Emits a domain event. A send without subscribers is not an error.
    pub(crate) fn emit(&self, event: RoundEvent) {
        if self.events.send(event).is_err() {
            log::debug!("No subscribers for event {event:?}");
        }
    }
}
