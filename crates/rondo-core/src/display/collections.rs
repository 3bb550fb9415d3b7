//! Collection wrapper types for displaying groups of domain objects.
//!
//! These newtypes give collections a Display implementation with
//! consistent structure and graceful empty-collection handling.

use std::{fmt, ops::Index};

use crate::models::{RoundSummary, Stop};

/// Newtype wrapper for displaying collections of round summaries.
///
/// Formats each summary with its own Display implementation and prints a
/// friendly message for empty collections.
pub struct RoundSummaries(pub Vec<RoundSummary>);

impl RoundSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of round summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the round summary at the given index.
    pub fn get(&self, index: usize) -> Option<&RoundSummary> {
        self.0.get(index)
    }

    /// Get an iterator over the round summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, RoundSummary> {
        self.0.iter()
    }
}

impl Index<usize> for RoundSummaries {
    type Output = RoundSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for RoundSummaries {
    type Item = RoundSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RoundSummaries {
    type Item = &'a RoundSummary;
    type IntoIter = std::slice::Iter<'a, RoundSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for RoundSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No rounds found.")
        } else {
            for round in &self.0 {
                write!(f, "{}", round)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of stops.
///
/// Formats each stop using the Stop Display trait and handles empty
/// collections gracefully.
pub struct Stops(pub Vec<Stop>);

impl Stops {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of stops in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the stop at the given index.
    pub fn get(&self, index: usize) -> Option<&Stop> {
        self.0.get(index)
    }

    /// Get an iterator over the stops.
    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.0.iter()
    }
}

impl Index<usize> for Stops {
    type Output = Stop;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Stops {
    type Item = Stop;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Stops {
    type Item = &'a Stop;
    type IntoIter = std::slice::Iter<'a, Stop>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Stops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No stops found.")
        } else {
            for stop in &self.0 {
                write!(f, "{}", stop)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use jiff::Timestamp;

    use super::*;
    use crate::models::RoundStatus;

    fn create_test_round_summary() -> RoundSummary {
        RoundSummary {
            id: 1,
            name: "Morning east side".to_string(),
            date: date(2026, 8, 6),
            status: RoundStatus::Started,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
            total_stops: 3,
            completed_stops: 1,
            pending_stops: 2,
        }
    }

    fn create_test_stop() -> Stop {
        Stop {
            id: 1,
            round_id: 1,
            patient_name: "Jo Miller".to_string(),
            patient_address: "12 Elm Street".to_string(),
            scheduled_time: time(8, 30, 0, 0),
            care_label: "Wound care".to_string(),
            completed: false,
            order: 1,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_round_summaries_display() {
        let summaries = RoundSummaries(vec![create_test_round_summary()]);
        let output = format!("{}", summaries);
        assert!(output.contains("Morning east side"));
        assert!(output.contains("(ID: 1) (1/3)"));

        // Empty collection
        let empty = RoundSummaries(vec![]);
        assert_eq!(format!("{}", empty), "No rounds found.\n");

        // Multiple rounds
        let mut second = create_test_round_summary();
        second.id = 2;
        second.name = "Afternoon".to_string();
        let summaries = RoundSummaries(vec![create_test_round_summary(), second]);
        let output = format!("{}", summaries);
        assert!(output.contains("## Morning east side"));
        assert!(output.contains("## Afternoon"));
    }

    #[test]
    fn test_stops_display_empty() {
        let stops = Stops(vec![]);
        assert_eq!(format!("{}", stops), "No stops found.\n");
    }

    #[test]
    fn test_stops_display_single_stop() {
        let stops = Stops(vec![create_test_stop()]);
        let output = format!("{}", stops);

        assert!(output.contains("Jo Miller"));
        assert!(output.contains("○ Pending"));
        assert!(output.contains("12 Elm Street"));
        assert!(output.contains("08:30"));
    }

    #[test]
    fn test_stops_display_mixed_completion() {
        let pending = create_test_stop();
        let mut completed = create_test_stop();
        completed.id = 2;
        completed.order = 2;
        completed.patient_name = "Sam Okafor".to_string();
        completed.completed = true;

        let stops = Stops(vec![pending, completed]);
        let output = format!("{}", stops);

        assert!(output.contains("○ Pending"));
        assert!(output.contains("✓ Completed"));
        assert!(output.contains("Sam Okafor"));
    }
}
