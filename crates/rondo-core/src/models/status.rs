//! Lifecycle status enumeration for rounds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of round lifecycle states.
///
/// A round starts out `Planned`, moves to `Started` when the caregiver
/// begins the first visit, and ends `Completed` once every stop is done.
/// Reactivating a stop of a completed round moves it back to `Started`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// Round is being planned; stops may be added and removed
    #[default]
    Planned,

    /// Round is underway; stops toggle completion individually
    Started,

    /// Every stop of the round has been completed
    Completed,
}

impl FromStr for RoundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(RoundStatus::Planned),
            "started" => Ok(RoundStatus::Started),
            "completed" => Ok(RoundStatus::Completed),
            _ => Err(format!("Invalid round status: {s}")),
        }
    }
}

impl RoundStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Planned => "planned",
            RoundStatus::Started => "started",
            RoundStatus::Completed => "completed",
        }
    }

    /// Whether the stop set of a round in this state may still be edited.
    ///
    /// Stops can only be added or removed while the round is planned;
    /// once a round has been started its visit set is fixed.
    pub fn allows_stop_editing(&self) -> bool {
        matches!(self, RoundStatus::Planned)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rondo_core::models::RoundStatus;
    ///
    /// assert_eq!(RoundStatus::Planned.with_icon(), "○ Planned");
    /// assert_eq!(RoundStatus::Started.with_icon(), "➤ Started");
    /// assert_eq!(RoundStatus::Completed.with_icon(), "✓ Completed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            RoundStatus::Planned => "○ Planned",
            RoundStatus::Started => "➤ Started",
            RoundStatus::Completed => "✓ Completed",
        }
    }
}
