//! Navigation request building from an ordered stop list.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundsError};
use crate::models::Stop;

/// Waypoint structure handed to an external mapping provider.
///
/// Building the itinerary is pure computation; the mapping provider call
/// it feeds belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Itinerary {
    /// Address of the first stop
    pub origin: String,
    /// Address of the last stop
    pub destination: String,
    /// Addresses of all stops between them, in travel order
    pub intermediate: Vec<String>,
}

/// Builds a navigation request from a round's travel sequence.
///
/// # Errors
///
/// Returns `RoundsError::InsufficientStops` when fewer than two stops are
/// given; navigating needs at least an origin and a destination.
pub fn build_itinerary(stops: &[Stop]) -> Result<Itinerary> {
    if stops.len() < 2 {
        return Err(RoundsError::InsufficientStops {
            required: 2,
            actual: stops.len(),
        });
    }

    let origin = stops[0].patient_address.clone();
    let destination = stops[stops.len() - 1].patient_address.clone();
    let intermediate = stops[1..stops.len() - 1]
        .iter()
        .map(|s| s.patient_address.clone())
        .collect();

    Ok(Itinerary {
        origin,
        destination,
        intermediate,
    })
}
