//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (in
//! [`models`]); this module adds newtype wrappers for collections and
//! operation results so the same data formats consistently across output
//! contexts (lists, creation confirmations, status lines). All formatters
//! produce markdown for rich terminal rendering.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (RoundSummaries, Stops)
//! - [`results`]: Operation result and status types
//! - [`models`]: Display implementations for domain models

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

pub mod collections;
pub mod models;
pub mod results;

// Re-export commonly used types for convenience
pub use collections::{RoundSummaries, Stops};
pub use results::{CreateResult, DeleteResult, OperationStatus};

/// A wrapper around [`Timestamp`] that formats it in the system timezone
/// via the `Display` trait.
///
/// The display format follows the pattern `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
