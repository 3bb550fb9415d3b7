//! Stop CRUD operations and queries.
//!
//! Stop-set editing (add/remove) is only permitted while the owning round
//! is planned; the precondition is checked inside the same transaction
//! that applies the change. Stop orders are 1-indexed and kept contiguous.

use jiff::civil::Time;
use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, RoundsError},
    models::{RoundStatus, Stop},
};

// SQL queries as const strings
const SELECT_ROUND_STATUS_SQL: &str = "SELECT status FROM rounds WHERE id = ?1";
const GET_NEXT_STOP_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(stop_order), 0) + 1 FROM stops WHERE round_id = ?1";
const INSERT_STOP_SQL: &str = "INSERT INTO stops (round_id, patient_name, patient_address, scheduled_time, care_label, completed, stop_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_ROUND_TIMESTAMP_SQL: &str = "UPDATE rounds SET updated_at = ?1 WHERE id = ?2";
const SELECT_STOPS_BY_ROUND_SQL: &str = "SELECT id, round_id, patient_name, patient_address, scheduled_time, care_label, completed, stop_order, created_at, updated_at FROM stops WHERE round_id = ?1 ORDER BY stop_order";
const SELECT_STOP_BY_ID_SQL: &str = "SELECT id, round_id, patient_name, patient_address, scheduled_time, care_label, completed, stop_order, created_at, updated_at FROM stops WHERE id = ?1";
const SELECT_STOP_ORDER_IN_ROUND_SQL: &str =
    "SELECT stop_order FROM stops WHERE id = ?1 AND round_id = ?2";
const DELETE_STOP_SQL: &str = "DELETE FROM stops WHERE id = ?1";
const UPDATE_STOP_ORDERS_DECREMENT_SQL: &str =
    "UPDATE stops SET stop_order = stop_order - 1 WHERE round_id = ?1 AND stop_order > ?2";
const UPDATE_STOP_ORDER_SQL: &str =
    "UPDATE stops SET stop_order = ?1, updated_at = ?2 WHERE id = ?3";
const SELECT_STOP_IDS_BY_ROUND_SQL: &str =
    "SELECT id FROM stops WHERE round_id = ?1 ORDER BY stop_order";

impl super::Database {
    /// Helper function to construct a Stop from a database row
    pub(super) fn build_stop_from_row(row: &rusqlite::Row) -> rusqlite::Result<Stop> {
        Ok(Stop {
            id: row.get::<_, i64>(0)? as u64,
            round_id: row.get::<_, i64>(1)? as u64,
            patient_name: row.get(2)?,
            patient_address: row.get(3)?,
            scheduled_time: row.get::<_, String>(4)?.parse::<Time>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?,
            care_label: row.get(5)?,
            completed: row.get::<_, i64>(6)? != 0,
            order: row.get::<_, i64>(7)? as u32,
            created_at: row.get::<_, String>(8)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
            })?,
            updated_at: row.get::<_, String>(9)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
            })?,
        })
    }

    /// Reads a round's status inside a transaction, mapping a missing row
    /// to `RoundNotFound`.
    pub(super) fn round_status_tx(tx: &rusqlite::Transaction, round_id: u64) -> Result<RoundStatus> {
        let status_str: Option<String> = tx
            .query_row(SELECT_ROUND_STATUS_SQL, params![round_id as i64], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| RoundsError::database("Failed to query round status", e))?;

        let status_str = status_str.ok_or(RoundsError::RoundNotFound { id: round_id })?;
        status_str
            .parse::<RoundStatus>()
            .map_err(|reason| RoundsError::Configuration { message: reason })
    }

    /// Adds a new stop to the end of a planned round's travel sequence.
    pub fn add_stop(
        &mut self,
        round_id: u64,
        patient_name: &str,
        patient_address: &str,
        scheduled_time: Time,
        care_label: &str,
    ) -> Result<Stop> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, round_id)?;
        if !status.allows_stop_editing() {
            return Err(RoundsError::InvalidTransition {
                operation: "add a stop",
                status,
            });
        }

        let next_order: i64 = tx
            .query_row(GET_NEXT_STOP_ORDER_SQL, params![round_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| RoundsError::database("Failed to get next stop order", e))?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_STOP_SQL,
            params![
                round_id as i64,
                patient_name,
                patient_address,
                scheduled_time.to_string(),
                care_label,
                0i64,
                next_order,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| RoundsError::database("Failed to insert stop", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.execute(
            UPDATE_ROUND_TIMESTAMP_SQL,
            params![&now_str, round_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to update round timestamp", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Stop {
            id,
            round_id,
            patient_name: patient_name.into(),
            patient_address: patient_address.into(),
            scheduled_time,
            care_label: care_label.into(),
            completed: false,
            order: next_order as u32,
            created_at: now,
            updated_at: now,
        })
    }

    /// Removes a stop from a planned round and renumbers the remaining
    /// stops contiguously.
    pub fn remove_stop(&mut self, round_id: u64, stop_id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, round_id)?;
        if !status.allows_stop_editing() {
            return Err(RoundsError::InvalidTransition {
                operation: "remove a stop",
                status,
            });
        }

        let stop_order: i64 = tx
            .query_row(
                SELECT_STOP_ORDER_IN_ROUND_SQL,
                params![stop_id as i64, round_id as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RoundsError::database("Failed to query stop", e))?
            .ok_or(RoundsError::StopNotFound { id: stop_id })?;

        tx.execute(DELETE_STOP_SQL, params![stop_id as i64])
            .map_err(|e| RoundsError::database("Failed to delete stop", e))?;

        tx.execute(
            UPDATE_STOP_ORDERS_DECREMENT_SQL,
            params![round_id as i64, stop_order],
        )
        .map_err(|e| RoundsError::database("Failed to renumber stops", e))?;

        let now_str = Timestamp::now().to_string();
        tx.execute(
            UPDATE_ROUND_TIMESTAMP_SQL,
            params![&now_str, round_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to update round timestamp", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Retrieves all stops of a round in travel order.
    pub fn get_stops(&self, round_id: u64) -> Result<Vec<Stop>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STOPS_BY_ROUND_SQL)
            .map_err(|e| RoundsError::database("Failed to prepare query", e))?;

        let stops = stmt
            .query_map(params![round_id as i64], Self::build_stop_from_row)
            .map_err(|e| RoundsError::database("Failed to query stops", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RoundsError::database("Failed to fetch stops", e))?;

        Ok(stops)
    }

    /// Retrieves a single stop by its ID.
    pub fn get_stop(&self, stop_id: u64) -> Result<Option<Stop>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STOP_BY_ID_SQL)
            .map_err(|e| RoundsError::database("Failed to prepare query", e))?;

        let stop = stmt
            .query_row(params![stop_id as i64], Self::build_stop_from_row)
            .optional()
            .map_err(|e| RoundsError::database("Failed to get stop", e))?;

        Ok(stop)
    }

    /// Atomically replaces a round's travel sequence with the given stop
    /// ids, renumbering orders 1..=n.
    ///
    /// This is the whole-round replace path used to apply a route
    /// optimization result. The id list must be a permutation of the
    /// round's current stop set, and the round must not be completed.
    pub fn reorder_stops(&mut self, round_id: u64, ordered_stop_ids: &[u64]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let status = Self::round_status_tx(&tx, round_id)?;
        if status == RoundStatus::Completed {
            return Err(RoundsError::InvalidTransition {
                operation: "reorder stops",
                status,
            });
        }

        let current_ids: Vec<u64> = {
            let mut stmt = tx
                .prepare(SELECT_STOP_IDS_BY_ROUND_SQL)
                .map_err(|e| RoundsError::database("Failed to prepare query", e))?;
            let ids = stmt
                .query_map(params![round_id as i64], |row| {
                    Ok(row.get::<_, i64>(0)? as u64)
                })
                .map_err(|e| RoundsError::database("Failed to query stop ids", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| RoundsError::database("Failed to fetch stop ids", e))?;
            ids
        };

        if ordered_stop_ids.len() != current_ids.len() {
            return Err(RoundsError::invalid_input(
                "stop_ids",
                format!(
                    "Expected {} stop ids, got {}",
                    current_ids.len(),
                    ordered_stop_ids.len()
                ),
            ));
        }

        for &stop_id in ordered_stop_ids {
            if !current_ids.contains(&stop_id) {
                return Err(RoundsError::StopNotFound { id: stop_id });
            }
        }

        let now_str = Timestamp::now().to_string();

        // Two-phase renumbering: negative temporaries first to avoid
        // tripping the (round_id, stop_order) unique constraint.
        for (position, &stop_id) in ordered_stop_ids.iter().enumerate() {
            tx.execute(
                UPDATE_STOP_ORDER_SQL,
                params![-((position as i64) + 1), &now_str, stop_id as i64],
            )
            .map_err(|e| RoundsError::database("Failed to stage stop order", e))?;
        }

        for (position, &stop_id) in ordered_stop_ids.iter().enumerate() {
            tx.execute(
                UPDATE_STOP_ORDER_SQL,
                params![(position as i64) + 1, &now_str, stop_id as i64],
            )
            .map_err(|e| RoundsError::database("Failed to update stop order", e))?;
        }

        tx.execute(
            UPDATE_ROUND_TIMESTAMP_SQL,
            params![&now_str, round_id as i64],
        )
        .map_err(|e| RoundsError::database("Failed to update round timestamp", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
