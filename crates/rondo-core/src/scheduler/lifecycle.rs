//! Lifecycle transitions for the Scheduler.
//!
//! Each method runs the corresponding store transaction and, once it has
//! committed, emits the matching domain event. Events for a given round
//! are emitted in commit order.

use log::info;
use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, RoundsError},
    models::{Round, RoundEvent},
    params::{Id, StopRef},
};

impl Scheduler {
    /// Starts a planned round with at least one stop.
    pub async fn start_round(&self, params: &Id) -> Result<Round> {
        let db_path = self.db_path.clone();
        let round_id = params.id;

        let round = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.start_round(round_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Round {round_id} started with {} stops", round.stops.len());
        self.emit(RoundEvent::RoundStarted { round_id });

        Ok(round)
    }

    /// Marks a stop of a started round as completed.
    ///
    /// When the last pending stop completes, the round transitions to
    /// `Completed` in the same store transaction and both the
    /// `StopCompleted` and `RoundCompleted` events are emitted, in that
    /// order.
    pub async fn complete_stop(&self, params: &StopRef) -> Result<Round> {
        let db_path = self.db_path.clone();
        let round_id = params.round_id;
        let stop_id = params.stop_id;

        let (round, round_completed) = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.complete_stop(round_id, stop_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Stop {stop_id} of round {round_id} completed");
        self.emit(RoundEvent::StopCompleted { round_id, stop_id });

        if round_completed {
            info!("Round {round_id} completed (all stops done)");
            self.emit(RoundEvent::RoundCompleted { round_id });
        }

        Ok(round)
    }

    /// Reverts a completed stop of a started or completed round.
    ///
    /// Reactivating a stop of a completed round moves the round back to
    /// `Started`; all other stops keep their completion state.
    pub async fn reactivate_stop(&self, params: &StopRef) -> Result<Round> {
        let db_path = self.db_path.clone();
        let round_id = params.round_id;
        let stop_id = params.stop_id;

        let round = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.reactivate_stop(round_id, stop_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Stop {stop_id} of round {round_id} reactivated");
        self.emit(RoundEvent::StopReactivated { round_id, stop_id });

        Ok(round)
    }

    /// Explicitly completes a started round, forcing every remaining stop
    /// to completed.
    pub async fn complete_round(&self, params: &Id) -> Result<Round> {
        let db_path = self.db_path.clone();
        let round_id = params.id;

        let round = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.complete_round(round_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("Round {round_id} completed");
        self.emit(RoundEvent::RoundCompleted { round_id });

        Ok(round)
    }
}
