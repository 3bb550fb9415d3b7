//! Round CRUD operations and queries.

use jiff::civil::Date;
use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, RoundsError},
    models::{Round, RoundFilter, RoundStatus, RoundSummary},
};

// SQL queries as const strings
const INSERT_ROUND_SQL: &str =
    "INSERT INTO rounds (name, round_date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_ROUND_SQL: &str =
    "SELECT id, name, round_date, status, created_at, updated_at FROM rounds WHERE id = ?1";
const CHECK_ROUND_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM rounds WHERE id = ?1)";
const DELETE_ROUND_STOPS_SQL: &str = "DELETE FROM stops WHERE round_id = ?1";
const DELETE_ROUND_SQL: &str = "DELETE FROM rounds WHERE id = ?1";
const SELECT_ROUND_SUMMARY_COLUMNS: &str =
    "id, name, round_date, status, created_at, updated_at, total_stops, completed_stops, pending_stops";

impl super::Database {
    /// Helper function to construct a Round (without stops) from a row.
    pub(super) fn build_round_from_row(row: &rusqlite::Row) -> rusqlite::Result<Round> {
        let status_str: String = row.get(3)?;
        let status = status_str.parse::<RoundStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("Invalid round status: {status_str}").into(),
            )
        })?;

        Ok(Round {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            date: row.get::<_, String>(2)?.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
            })?,
            status,
            stops: Vec::new(),
            created_at: row.get::<_, String>(4)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?,
            updated_at: row.get::<_, String>(5)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
            })?,
        })
    }

    /// Creates a new round with the given name and date.
    ///
    /// New rounds always start in `Planned` with an empty stop list.
    pub fn create_round(&mut self, name: &str, date: Date) -> Result<Round> {
        if name.trim().is_empty() {
            return Err(RoundsError::invalid_input(
                "name",
                "Round name must not be empty",
            ));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_ROUND_SQL,
            params![
                name,
                date.to_string(),
                RoundStatus::Planned.as_str(),
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| RoundsError::database("Failed to insert round", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Round {
            id,
            name: name.into(),
            date,
            status: RoundStatus::Planned,
            stops: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a round by its ID with stops eagerly loaded in travel
    /// order.
    pub fn get_round(&self, id: u64) -> Result<Option<Round>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ROUND_SQL)
            .map_err(|e| RoundsError::database("Failed to prepare query", e))?;

        let mut round = stmt
            .query_row(params![id as i64], Self::build_round_from_row)
            .optional()
            .map_err(|e| RoundsError::database("Failed to query round", e))?;

        if let Some(ref mut round) = round {
            round.stops = self.get_stops(round.id)?;
        }

        Ok(round)
    }

    /// Lists rounds in insertion order with optional filtering.
    pub fn list_rounds(&self, filter: Option<&RoundFilter>) -> Result<Vec<Round>> {
        let mut query =
            String::from("SELECT id, name, round_date, status, created_at, updated_at FROM rounds");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(date) = f.date {
                conditions.push("round_date = ?");
                params_vec.push(Box::new(date.to_string()));
            }

            if let Some(ref name) = f.name_contains {
                conditions.push("name LIKE ?");
                params_vec.push(Box::new(format!("%{name}%")));
            }

            if let Some(status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        // Insertion order, stable under any filter
        query.push_str(" ORDER BY id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| RoundsError::database("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut rounds: Vec<Round> = stmt
            .query_map(&params_refs[..], Self::build_round_from_row)
            .map_err(|e| RoundsError::database("Failed to query rounds", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RoundsError::database("Failed to fetch rounds", e))?;

        for round in &mut rounds {
            round.stops = self.get_stops(round.id)?;
        }

        Ok(rounds)
    }

    /// Lists round summaries (with stop counts) in insertion order, using
    /// the `round_summaries` view.
    pub fn list_round_summaries(&self, filter: Option<&RoundFilter>) -> Result<Vec<RoundSummary>> {
        let mut query = format!("SELECT {SELECT_ROUND_SUMMARY_COLUMNS} FROM round_summaries");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(date) = f.date {
                conditions.push("round_date = ?");
                params_vec.push(Box::new(date.to_string()));
            }

            if let Some(ref name) = f.name_contains {
                conditions.push("name LIKE ?");
                params_vec.push(Box::new(format!("%{name}%")));
            }

            if let Some(status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| RoundsError::database("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], |row| {
                let status_str: String = row.get(3)?;
                let status = status_str.parse::<RoundStatus>().map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        Type::Text,
                        format!("Invalid round status: {status_str}").into(),
                    )
                })?;

                Ok(RoundSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    date: row.get::<_, String>(2)?.parse::<Date>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
                    })?,
                    status,
                    created_at: row.get::<_, String>(4)?.parse::<Timestamp>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                    })?,
                    updated_at: row.get::<_, String>(5)?.parse::<Timestamp>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                    })?,
                    total_stops: row.get::<_, i64>(6)? as u32,
                    completed_stops: row.get::<_, i64>(7)? as u32,
                    pending_stops: row.get::<_, i64>(8)? as u32,
                })
            })
            .map_err(|e| RoundsError::database("Failed to query round summaries", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RoundsError::database("Failed to fetch round summaries", e))?;

        Ok(summaries)
    }

    /// Permanently deletes a round and all its stops.
    /// This operation cannot be undone.
    pub fn delete_round(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_ROUND_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .map_err(|e| RoundsError::database("Failed to check round existence", e))?;

        if !exists {
            return Err(RoundsError::RoundNotFound { id });
        }

        // Foreign key cascade would handle the stops, but be explicit
        tx.execute(DELETE_ROUND_STOPS_SQL, params![id as i64])
            .map_err(|e| RoundsError::database("Failed to delete round stops", e))?;

        tx.execute(DELETE_ROUND_SQL, params![id as i64])
            .map_err(|e| RoundsError::database("Failed to delete round", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
