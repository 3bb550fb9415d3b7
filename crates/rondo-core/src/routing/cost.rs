//! Travel cost provider interface and the pairwise cost matrix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundsError};
use crate::models::Stop;

/// Estimated travel cost of the edge between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Driving distance in kilometres
    pub distance_km: f64,
    /// Driving duration in minutes
    pub duration_minutes: f64,
}

/// External distance/duration provider.
///
/// Costs are assumed symmetric: `leg(a, b)` and `leg(b, a)` are
/// interchangeable. Implementations are typically backed by a routing
/// service; [`TableCostProvider`] is the deterministic in-memory variant
/// used by tests and offline tooling.
pub trait CostProvider: Send + Sync {
    /// Estimates the travel cost from one stop to another.
    ///
    /// # Errors
    ///
    /// Returns `RoundsError::ProviderUnavailable` when the backing
    /// service cannot answer.
    fn leg(&self, from: &Stop, to: &Stop) -> Result<Leg>;
}

/// Deterministic in-memory provider keyed by address pairs.
///
/// Inserting a leg registers it in both directions.
#[derive(Debug, Default)]
pub struct TableCostProvider {
    legs: HashMap<(String, String), Leg>,
}

impl TableCostProvider {
    /// Creates an empty cost table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the symmetric cost between two addresses.
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        distance_km: f64,
        duration_minutes: f64,
    ) {
        let from = from.into();
        let to = to.into();
        let leg = Leg {
            distance_km,
            duration_minutes,
        };
        self.legs.insert((from.clone(), to.clone()), leg);
        self.legs.insert((to, from), leg);
    }
}

impl CostProvider for TableCostProvider {
    fn leg(&self, from: &Stop, to: &Stop) -> Result<Leg> {
        self.legs
            .get(&(from.patient_address.clone(), to.patient_address.clone()))
            .copied()
            .ok_or_else(|| RoundsError::ProviderUnavailable {
                reason: format!(
                    "No cost entry between '{}' and '{}'",
                    from.patient_address, to.patient_address
                ),
            })
    }
}

/// Symmetric pairwise cost matrix over a stop list.
///
/// Built once per optimization so each provider pair is queried exactly
/// once, then consulted by index during construction and improvement.
pub(crate) struct CostMatrix {
    n: usize,
    distance: Vec<f64>,
    duration: Vec<f64>,
}

impl CostMatrix {
    /// Queries the provider for every stop pair.
    pub(crate) fn build(stops: &[Stop], provider: &dyn CostProvider) -> Result<Self> {
        let n = stops.len();
        let mut distance = vec![0.0; n * n];
        let mut duration = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let leg = provider.leg(&stops[i], &stops[j])?;
                distance[i * n + j] = leg.distance_km;
                distance[j * n + i] = leg.distance_km;
                duration[i * n + j] = leg.duration_minutes;
                duration[j * n + i] = leg.duration_minutes;
            }
        }

        Ok(Self {
            n,
            distance,
            duration,
        })
    }

    pub(crate) fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance[i * self.n + j]
    }

    /// Total distance of an open path visiting stops in the given index
    /// order.
    pub(crate) fn path_distance(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// Total duration of an open path visiting stops in the given index
    /// order.
    pub(crate) fn path_duration(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| self.duration[pair[0] * self.n + pair[1]])
            .sum()
    }
}
