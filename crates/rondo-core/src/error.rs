//! Error types for the round scheduling library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::RoundStatus;

/// Comprehensive error type for all round scheduling operations.
#[derive(Error, Debug)]
pub enum RoundsError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Round not found for the given ID
    #[error("Round with ID {id} not found")]
    RoundNotFound { id: u64 },
    /// Stop not found for the given ID (or not part of the given round)
    #[error("Stop with ID {id} not found")]
    StopNotFound { id: u64 },
    /// Requested lifecycle operation violates the round state machine.
    /// Carries the round's current status so callers can reconcile.
    #[error("Cannot {operation}: round is {status}")]
    InvalidTransition {
        operation: &'static str,
        status: RoundStatus,
    },
    /// A round with no stops cannot be started
    #[error("Round with ID {id} has no stops and cannot be started")]
    EmptyRound { id: u64 },
    /// Too few stops for route optimization or itinerary building
    #[error("At least {required} stops are required, but the round has {actual}")]
    InsufficientStops { required: usize, actual: usize },
    /// The distance/duration provider failed or timed out. Callers fall
    /// back to the unoptimized stop order.
    #[error("Routing provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RoundsError {
    /// Creates a database error with additional context.
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Creates an input validation error for a field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| RoundsError::database(message, e))
    }
}

/// Result type alias for round scheduling operations
pub type Result<T> = std::result::Result<T, RoundsError>;
