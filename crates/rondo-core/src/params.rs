//! Parameter structures for round scheduling operations
//!
//! This module contains shared parameter structures that can be used across
//! different interfaces (CLI, future HTTP API, etc.) without
//! framework-specific derives or dependencies.
//!
//! ## Architecture: Parameter Wrapper Pattern
//!
//! Interface layers wrap these structures with their own derives and convert
//! into them, keeping the core free of UI framework concerns:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   Scheduler     │
//! │ (clap derives)  │───▶│ (serde only)    │───▶│ (business logic)│
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Validation that requires domain knowledge (date and time parsing,
//! required-field checks) lives here on the core parameter types, so every
//! interface benefits from the same rules.

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundsError};

/// Generic parameters for operations requiring just a round ID.
///
/// Used for operations like show, start, complete, optimize, itinerary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the round to operate on
    pub id: u64,
}

/// Parameters addressing a single stop within a round.
///
/// Lifecycle operations on stops always name both ids; a stop id that
/// exists but belongs to a different round is treated as not found.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StopRef {
    /// ID of the round the stop belongs to
    pub round_id: u64,
    /// ID of the stop
    pub stop_id: u64,
}

/// Parameters for creating a new round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRound {
    /// Name of the round (required, must not be blank)
    pub name: String,
    /// Day of the round in `YYYY-MM-DD` form
    pub date: String,
}

impl CreateRound {
    /// Validate the round name and parse the date.
    ///
    /// # Errors
    ///
    /// * `RoundsError::InvalidInput` - when the name is blank or the date
    ///   is not a valid `YYYY-MM-DD` calendar date
    pub fn validate(&self) -> Result<Date> {
        if self.name.trim().is_empty() {
            return Err(RoundsError::invalid_input(
                "name",
                "Round name must not be empty",
            ));
        }

        self.date.parse::<Date>().map_err(|e| {
            RoundsError::invalid_input("date", format!("Invalid date '{}': {e}", self.date))
        })
    }
}

/// Parameters for listing rounds.
///
/// Both filters are optional; without them every round is returned in
/// insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRounds {
    /// Only rounds on this day (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: Option<String>,
    /// Only rounds in this lifecycle state
    #[serde(default)]
    pub status: Option<String>,
}

/// Parameters for adding a stop to a planned round.
///
/// Patient name and address are stored as snapshots; callers resolving a
/// patient through the directory collaborator use
/// [`AddStopForPatient`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddStop {
    /// ID of the round to add the stop to
    pub round_id: u64,
    /// Patient name snapshot (required)
    pub patient_name: String,
    /// Patient address snapshot (required)
    pub patient_address: String,
    /// Visit time in `HH:MM` or `HH:MM:SS` form
    pub scheduled_time: String,
    /// Free-text description of the care to perform
    pub care_label: String,
}

impl AddStop {
    /// Validate required fields and parse the scheduled time.
    ///
    /// # Errors
    ///
    /// * `RoundsError::InvalidInput` - when the patient name or address is
    ///   blank, or the time does not parse as a wall-clock time
    pub fn validate(&self) -> Result<Time> {
        if self.patient_name.trim().is_empty() {
            return Err(RoundsError::invalid_input(
                "patient_name",
                "Patient name must not be empty",
            ));
        }

        if self.patient_address.trim().is_empty() {
            return Err(RoundsError::invalid_input(
                "patient_address",
                "Patient address must not be empty",
            ));
        }

        self.scheduled_time.parse::<Time>().map_err(|e| {
            RoundsError::invalid_input(
                "scheduled_time",
                format!("Invalid time '{}': {e}", self.scheduled_time),
            )
        })
    }
}

/// Parameters for adding a stop by patient ID.
///
/// The patient's name and address are looked up through the patient
/// directory collaborator and snapshotted into the new stop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddStopForPatient {
    /// ID of the round to add the stop to
    pub round_id: u64,
    /// Patient ID to resolve through the directory
    pub patient_id: String,
    /// Visit time in `HH:MM` or `HH:MM:SS` form
    pub scheduled_time: String,
    /// Free-text description of the care to perform
    pub care_label: String,
}

/// Parameters for permanently deleting a round.
///
/// Requires explicit confirmation to prevent accidental deletion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeleteRound {
    /// ID of the round to delete
    pub id: u64,
    /// Must be true for the deletion to proceed
    #[serde(default)]
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    #[test]
    fn test_create_round_validate_ok() {
        let params = CreateRound {
            name: "Morning".to_string(),
            date: "2026-08-06".to_string(),
        };

        assert_eq!(params.validate().unwrap(), date(2026, 8, 6));
    }

    #[test]
    fn test_create_round_validate_blank_name() {
        let params = CreateRound {
            name: "   ".to_string(),
            date: "2026-08-06".to_string(),
        };

        match params.validate() {
            Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_round_validate_bad_date() {
        let params = CreateRound {
            name: "Morning".to_string(),
            date: "tomorrow".to_string(),
        };

        match params.validate() {
            Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "date"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_add_stop_validate_ok() {
        let params = AddStop {
            round_id: 1,
            patient_name: "Jo Miller".to_string(),
            patient_address: "12 Elm Street".to_string(),
            scheduled_time: "08:30".to_string(),
            care_label: "Medication".to_string(),
        };

        assert_eq!(params.validate().unwrap(), time(8, 30, 0, 0));
    }

    #[test]
    fn test_add_stop_validate_blank_fields() {
        let mut params = AddStop {
            round_id: 1,
            patient_name: String::new(),
            patient_address: "12 Elm Street".to_string(),
            scheduled_time: "08:30".to_string(),
            care_label: "Medication".to_string(),
        };

        match params.validate() {
            Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "patient_name"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }

        params.patient_name = "Jo Miller".to_string();
        params.patient_address = " ".to_string();

        match params.validate() {
            Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "patient_address"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_add_stop_validate_bad_time() {
        let params = AddStop {
            round_id: 1,
            patient_name: "Jo Miller".to_string(),
            patient_address: "12 Elm Street".to_string(),
            scheduled_time: "8 o'clock".to_string(),
            care_label: "Medication".to_string(),
        };

        match params.validate() {
            Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "scheduled_time"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }
}
