//! Lifecycle transition queries for rounds.
//!
//! Each transition checks its precondition and applies its effect inside a
//! single transaction, so the round status and the stops' completion flags
//! always change together. The "is the round done" derivation lives here,
//! computed once per transition, never in callers.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, RoundsError},
    models::{Round, RoundStatus},
};

// SQL queries as const strings
const COUNT_STOPS_SQL: &str = "SELECT COUNT(*) FROM stops WHERE round_id = ?1";
const COUNT_PENDING_STOPS_SQL: &str =
    "SELECT COUNT(*) FROM stops WHERE round_id = ?1 AND completed = 0";
const UPDATE_ROUND_STATUS_SQL: &str =
    "UPDATE rounds SET status = ?1, updated_at = ?2 WHERE id = ?3";
const SELECT_STOP_IN_ROUND_SQL: &str =
    "SELECT completed FROM stops WHERE id = ?1 AND round_id = ?2";
const UPDATE_STOP_COMPLETED_SQL: &str =
    "UPDATE stops SET completed = ?1, updated_at = ?2 WHERE id = ?3";
const COMPLETE_ALL_STOPS_SQL: &str =
    "UPDATE stops SET completed = 1, updated_at = ?1 WHERE round_id = ?2 AND completed = 0";

impl super::Database {
    /// Starts a planned round.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` - no round with the given id
    /// * `InvalidTransition` - the round is already started or completed
    /// * `EmptyRound` - the round has no stops
    pub fn start_round(&mut self, id: u64) -> Result<Round> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, id)?;
        if status != RoundStatus::Planned {
            return Err(RoundsError::InvalidTransition {
                operation: "start",
                status,
            });
        }

        let stop_count: i64 = tx
            .query_row(COUNT_STOPS_SQL, params![id as i64], |row| row.get(0))
            .map_err(|e| RoundsError::database("Failed to count stops", e))?;

        if stop_count == 0 {
            return Err(RoundsError::EmptyRound { id });
        }

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_ROUND_STATUS_SQL,
            params![RoundStatus::Started.as_str(), &now_str, id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to start round", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.require_round(id)
    }

    /// Marks a stop of a started round as completed.
    ///
    /// When the last pending stop completes, the round itself transitions
    /// to `Completed` in the same transaction. Returns the updated round
    /// and whether that implicit round completion happened.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` / `StopNotFound` - ids missing, or the stop does
    ///   not belong to the round
    /// * `InvalidTransition` - the round is not started
    pub fn complete_stop(&mut self, round_id: u64, stop_id: u64) -> Result<(Round, bool)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, round_id)?;
        if status != RoundStatus::Started {
            return Err(RoundsError::InvalidTransition {
                operation: "complete a stop",
                status,
            });
        }

        // The stop must belong to this round
        let _completed: i64 = tx
            .query_row(
                SELECT_STOP_IN_ROUND_SQL,
                params![stop_id as i64, round_id as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RoundsError::database("Failed to query stop", e))?
            .ok_or(RoundsError::StopNotFound { id: stop_id })?;

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_STOP_COMPLETED_SQL,
            params![1i64, &now_str, stop_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to complete stop", e))?;

        let pending: i64 = tx
            .query_row(COUNT_PENDING_STOPS_SQL, params![round_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| RoundsError::database("Failed to count pending stops", e))?;

        let round_completed = pending == 0;
        let new_status = if round_completed {
            RoundStatus::Completed
        } else {
            RoundStatus::Started
        };

        tx.execute(
            UPDATE_ROUND_STATUS_SQL,
            params![new_status.as_str(), &now_str, round_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to update round status", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok((self.require_round(round_id)?, round_completed))
    }

    /// Reverts a completed stop of a started or completed round.
    ///
    /// Reactivating a stop of a completed round moves the round back to
    /// `Started`; other stops' completion flags are untouched. Returns the
    /// updated round.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` / `StopNotFound` - ids missing, or the stop does
    ///   not belong to the round
    /// * `InvalidTransition` - the round is still planned
    pub fn reactivate_stop(&mut self, round_id: u64, stop_id: u64) -> Result<Round> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, round_id)?;
        if status == RoundStatus::Planned {
            return Err(RoundsError::InvalidTransition {
                operation: "reactivate a stop",
                status,
            });
        }

        let _completed: i64 = tx
            .query_row(
                SELECT_STOP_IN_ROUND_SQL,
                params![stop_id as i64, round_id as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RoundsError::database("Failed to query stop", e))?
            .ok_or(RoundsError::StopNotFound { id: stop_id })?;

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_STOP_COMPLETED_SQL,
            params![0i64, &now_str, stop_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to reactivate stop", e))?;

        if status == RoundStatus::Completed {
            tx.execute(
                UPDATE_ROUND_STATUS_SQL,
                params![RoundStatus::Started.as_str(), &now_str, round_id as i64],
            )
            .map_err(|e| RoundsError::database("Failed to update round status", e))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.require_round(round_id)
    }

    /// Explicitly completes a started round, marking every remaining stop
    /// as completed.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` - no round with the given id
    /// * `InvalidTransition` - the round is not started
    pub fn complete_round(&mut self, id: u64) -> Result<Round> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, id)?;
        if status != RoundStatus::Started {
            return Err(RoundsError::InvalidTransition {
                operation: "complete",
                status,
            });
        }

        let now_str = Timestamp::now().to_string();
        tx.execute(COMPLETE_ALL_STOPS_SQL, params![&now_str, id as i64])
            .map_err(|e| RoundsError::database("Failed to complete stops", e))?;

        tx.execute(
            UPDATE_ROUND_STATUS_SQL,
            params![RoundStatus::Completed.as_str(), &now_str, id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to complete round", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.require_round(id)
    }

    /// Loads a round that is known to exist, mapping absence to
    /// `RoundNotFound`.
    fn require_round(&self, id: u64) -> Result<Round> {
        self.get_round(id)?
            .ok_or(RoundsError::RoundNotFound { id })
    }
}
