//! Database operations and SQLite management for rounds and stops.
//!
//! This module is the round store: the authoritative, single-writer
//! collection of rounds. Every mutation runs inside one SQLite transaction,
//! so concurrent callers serialize per database and no reader ever observes
//! a half-updated round (stops renumbered but the status flag stale, or
//! vice versa). Lifecycle preconditions are checked inside the same
//! transaction that applies the effect.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod lifecycle_queries;
pub mod migrations;
pub mod round_queries;
pub mod stop_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
