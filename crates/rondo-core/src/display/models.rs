//! Display implementations for domain models.
//!
//! All output is markdown: rounds render as a header with metadata and a
//! nested stop list, stops as compact sections with completion icons, and
//! routing results as short reports a caregiver can read at a glance.

use std::fmt;

use super::LocalDateTime;
use crate::models::{Round, RoundEvent, RoundStatus, RoundSummary, Stop};
use crate::routing::{Itinerary, OptimizedRoute};

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Date: {}", self.date)?;
        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.stops.is_empty() {
            writeln!(
                f,
                "\n## Stops ({}/{} completed)",
                self.completed_stop_count(),
                self.stops.len()
            )?;
            writeln!(f)?;
            for stop in &self.stops {
                write!(f, "{}", stop)?;
            }
        } else {
            writeln!(f, "\nNo stops in this round.")?;
        }

        Ok(())
    }
}

impl Stop {
    /// Completion flag with consistent icon formatting for display.
    pub fn completion_icon(&self) -> &'static str {
        if self.completed {
            "✓ Completed"
        } else {
            "○ Pending"
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.order,
            self.patient_name,
            self.completion_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Address: {}", self.patient_address)?;
        writeln!(f, "- Time: {}", self.scheduled_time.strftime("%H:%M"))?;
        writeln!(f, "- Care: {}", self.care_label)?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_stops > 0 {
            format!(" ({}/{})", self.completed_stops, self.total_stops)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Date**: {}", self.date)?;
        writeln!(f, "- **Status**: {}", self.status.with_icon())?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RoundEvent::RoundStarted { round_id } => write!(f, "Round {round_id} started"),
            RoundEvent::StopCompleted { round_id, stop_id } => {
                write!(f, "Stop {stop_id} of round {round_id} completed")
            }
            RoundEvent::StopReactivated { round_id, stop_id } => {
                write!(f, "Stop {stop_id} of round {round_id} reactivated")
            }
            RoundEvent::RoundCompleted { round_id } => write!(f, "Round {round_id} completed"),
        }
    }
}

impl fmt::Display for OptimizedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.improved() {
            writeln!(
                f,
                "Optimized route saves {:.1} km and {} minutes",
                self.distance_saved_km, self.time_saved_minutes
            )?;
        } else {
            writeln!(f, "No shorter route found; keeping the current order")?;
        }
        writeln!(f)?;

        for stop in &self.stops {
            writeln!(
                f,
                "{}. {} ({})",
                stop.order, stop.patient_name, stop.patient_address
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Itinerary")?;
        writeln!(f)?;
        writeln!(f, "- Origin: {}", self.origin)?;
        for address in &self.intermediate {
            writeln!(f, "- Via: {address}")?;
        }
        writeln!(f, "- Destination: {}", self.destination)?;

        Ok(())
    }
}
