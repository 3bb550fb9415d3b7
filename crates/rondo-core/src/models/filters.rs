//! Filter types for querying rounds.

use jiff::civil::Date;

use super::RoundStatus;

/// Filter options for querying rounds.
///
/// Listing always returns rounds in insertion order; a filter narrows the
/// result set without changing that ordering.
#[derive(Debug, Clone, Default)]
pub struct RoundFilter {
    /// Filter by the day the round takes place
    pub date: Option<Date>,

    /// Filter by round name (case-insensitive partial match)
    pub name_contains: Option<String>,

    /// Filter by lifecycle status
    pub status: Option<RoundStatus>,
}

impl RoundFilter {
    /// Filter for all rounds on a given day.
    pub fn for_date(date: Date) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }
}

impl TryFrom<&crate::params::ListRounds> for RoundFilter {
    type Error = crate::RoundsError;

    /// Convert ListRounds parameters to a RoundFilter, parsing the
    /// optional date and status strings.
    ///
    /// # Errors
    ///
    /// * `RoundsError::InvalidInput` - when the date is not `YYYY-MM-DD`
    ///   or the status is not one of `planned`, `started`, `completed`
    fn try_from(params: &crate::params::ListRounds) -> Result<Self, Self::Error> {
        let date = params
            .date
            .as_deref()
            .map(|d| {
                d.parse::<Date>().map_err(|e| {
                    crate::RoundsError::invalid_input("date", format!("Invalid date '{d}': {e}"))
                })
            })
            .transpose()?;

        let status = params
            .status
            .as_deref()
            .map(|s| {
                s.parse::<RoundStatus>()
                    .map_err(|e| crate::RoundsError::invalid_input("status", e))
            })
            .transpose()?;

        Ok(Self {
            date,
            name_contains: None,
            status,
        })
    }
}
