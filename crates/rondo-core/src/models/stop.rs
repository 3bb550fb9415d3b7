//! Stop model definition.

use jiff::civil::Time;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One scheduled home visit within a round.
///
/// `patient_name` and `patient_address` are denormalized snapshots taken
/// from the patient directory when the stop is created. Changes to the
/// patient record never retroactively alter stored stops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    /// Unique identifier for the stop
    pub id: u64,

    /// ID of the owning round
    pub round_id: u64,

    /// Patient name snapshot at stop-creation time
    pub patient_name: String,

    /// Patient address snapshot at stop-creation time
    pub patient_address: String,

    /// Wall-clock visit time within the round's date
    pub scheduled_time: Time,

    /// Free-text description of the care to perform
    pub care_label: String,

    /// Whether the visit has been completed
    #[serde(default)]
    pub completed: bool,

    /// Position in the round's travel sequence (1-indexed, contiguous)
    pub order: u32,

    /// Timestamp when the stop was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the stop was last updated (UTC)
    pub updated_at: Timestamp,
}
