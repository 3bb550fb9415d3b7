//! Round summary types for list views.

use jiff::civil::Date;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Round, RoundStatus};

/// Summary information about a round with stop completion statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round ID
    pub id: u64,
    /// Name of the round
    pub name: String,
    /// The day the round takes place
    pub date: Date,
    /// Lifecycle status
    pub status: RoundStatus,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of stops
    pub total_stops: u32,
    /// Number of completed stops
    pub completed_stops: u32,
    /// Number of pending stops
    pub pending_stops: u32,
}

impl From<&Round> for RoundSummary {
    fn from(round: &Round) -> Self {
        let total_stops = round.stops.len() as u32;
        let completed_stops = round.completed_stop_count() as u32;

        Self {
            id: round.id,
            name: round.name.clone(),
            date: round.date,
            status: round.status,
            created_at: round.created_at,
            updated_at: round.updated_at,
            total_stops,
            completed_stops,
            pending_stops: total_stops - completed_stops,
        }
    }
}
