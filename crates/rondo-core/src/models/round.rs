//! Round model definition.

use jiff::civil::Date;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{RoundStatus, Stop};

/// A caregiver's ordered set of home-visit stops for one day.
///
/// The stop sequence is the travel sequence: `stops` is always sorted by
/// the stops' `order` field when loaded from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Round {
    /// Unique identifier for the round
    pub id: u64,

    /// Name of the round (e.g. "Morning east side")
    pub name: String,

    /// The day the round takes place
    pub date: Date,

    /// Lifecycle state (planned, started, or completed)
    #[serde(default)]
    pub status: RoundStatus,

    /// Ordered travel sequence of stops (eagerly loaded)
    #[serde(default)]
    pub stops: Vec<Stop>,

    /// Timestamp when the round was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the round was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Round {
    /// Number of completed stops in the round.
    pub fn completed_stop_count(&self) -> usize {
        self.stops.iter().filter(|s| s.completed).count()
    }

    /// Whether every stop of the round has been completed.
    ///
    /// For committed rounds this always agrees with
    /// `status == RoundStatus::Completed`; the store maintains that
    /// invariant inside each transition transaction.
    pub fn all_stops_completed(&self) -> bool {
        !self.stops.is_empty() && self.stops.iter().all(|s| s.completed)
    }
}
