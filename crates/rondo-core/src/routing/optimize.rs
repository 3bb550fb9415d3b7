//! Deterministic route optimization over a provider cost matrix.

use serde::{Deserialize, Serialize};

use super::cost::{CostMatrix, CostProvider};
use crate::error::Result;
use crate::models::Stop;

/// Strict-improvement tolerance for floating point cost comparisons.
const EPSILON: f64 = 1e-9;

/// Optimization requires at least this many stops; below it the input
/// order is returned untouched.
const MIN_STOPS: usize = 3;

/// Result of a route optimization.
///
/// `stops` is the same stop set as the input, possibly reordered, with the
/// `order` fields renumbered 1..=n. Savings are relative to the input
/// order and never negative: when the heuristic finds nothing better, the
/// input order comes back with zero savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizedRoute {
    /// The stop set in optimized travel order
    pub stops: Vec<Stop>,
    /// Estimated distance saved versus the input order, in kilometres
    pub distance_saved_km: f64,
    /// Estimated time saved versus the input order, in whole minutes
    pub time_saved_minutes: u32,
}

impl OptimizedRoute {
    /// Whether the optimizer found an order better than the input.
    pub fn improved(&self) -> bool {
        self.distance_saved_km > 0.0
    }

    /// Stop ids in optimized travel order, as accepted by the store's
    /// reorder operation.
    pub fn stop_ids(&self) -> Vec<u64> {
        self.stops.iter().map(|s| s.id).collect()
    }
}

/// Computes a stop ordering that reduces total travel distance.
///
/// The heuristic is nearest-neighbour construction from the first stop
/// followed by 2-opt segment-reversal improvement, both over an open path
/// with the first stop pinned (the caregiver is already headed to the
/// first visit). The scan order is fixed and ties break toward the lower
/// input index, so the result is fully determined by the input and the
/// provider's answers.
///
/// # Errors
///
/// Returns `RoundsError::ProviderUnavailable` when the provider cannot
/// price a stop pair; callers keep the original order in that case.
pub fn optimize(stops: &[Stop], provider: &dyn CostProvider) -> Result<OptimizedRoute> {
    let n = stops.len();
    if n < MIN_STOPS {
        return Ok(OptimizedRoute {
            stops: stops.to_vec(),
            distance_saved_km: 0.0,
            time_saved_minutes: 0,
        });
    }

    let matrix = CostMatrix::build(stops, provider)?;

    let identity: Vec<usize> = (0..n).collect();
    let original_distance = matrix.path_distance(&identity);
    let original_duration = matrix.path_duration(&identity);

    // Two deterministic candidates: the input order improved in place,
    // and a nearest-neighbour tour improved the same way.
    let mut refined = identity.clone();
    two_opt(&mut refined, &matrix);

    let mut constructed = nearest_neighbour(&matrix, n);
    two_opt(&mut constructed, &matrix);

    let best = if matrix.path_distance(&constructed) + EPSILON < matrix.path_distance(&refined) {
        constructed
    } else {
        refined
    };

    let best_distance = matrix.path_distance(&best);
    if best_distance + EPSILON >= original_distance {
        // No strict improvement: report the input order, zero savings.
        return Ok(OptimizedRoute {
            stops: stops.to_vec(),
            distance_saved_km: 0.0,
            time_saved_minutes: 0,
        });
    }

    let distance_saved_km = original_distance - best_distance;
    let duration_saved = (original_duration - matrix.path_duration(&best)).max(0.0);

    let optimized = best
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let mut stop = stops[index].clone();
            stop.order = (position + 1) as u32;
            stop
        })
        .collect();

    Ok(OptimizedRoute {
        stops: optimized,
        distance_saved_km,
        time_saved_minutes: duration_saved.round() as u32,
    })
}

/// Greedy tour construction: from the pinned first stop, repeatedly visit
/// the nearest unvisited stop. Ties break toward the lower index.
fn nearest_neighbour(matrix: &CostMatrix, n: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];

    order.push(0);
    visited[0] = true;

    for _ in 1..n {
        let last = *order.last().unwrap_or(&0);
        let mut next = None;
        let mut best = f64::INFINITY;

        for candidate in 1..n {
            if !visited[candidate] && matrix.distance(last, candidate) < best {
                best = matrix.distance(last, candidate);
                next = Some(candidate);
            }
        }

        if let Some(candidate) = next {
            visited[candidate] = true;
            order.push(candidate);
        }
    }

    order
}

/// 2-opt improvement for an open path with the first position pinned.
///
/// Reversing the segment `order[i..=j]` replaces the edges entering
/// position `i` and leaving position `j`; the reversal is applied whenever
/// the replacement is strictly shorter. Passes repeat until a full scan
/// yields no improvement.
fn two_opt(order: &mut [usize], matrix: &CostMatrix) {
    let n = order.len();

    loop {
        let mut improved = false;

        for i in 1..(n - 1) {
            for j in (i + 1)..n {
                let before = matrix.distance(order[i - 1], order[i])
                    + if j + 1 < n {
                        matrix.distance(order[j], order[j + 1])
                    } else {
                        0.0
                    };
                let after = matrix.distance(order[i - 1], order[j])
                    + if j + 1 < n {
                        matrix.distance(order[i], order[j + 1])
                    } else {
                        0.0
                    };

                if after + EPSILON < before {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;
    use jiff::Timestamp;

    use super::super::cost::TableCostProvider;
    use super::*;
    use crate::RoundsError;

    fn test_stop(id: u64, order: u32, address: &str) -> Stop {
        Stop {
            id,
            round_id: 1,
            patient_name: format!("Patient {id}"),
            patient_address: address.to_string(),
            scheduled_time: time(8, 0, 0, 0),
            care_label: "Care".to_string(),
            completed: false,
            order,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    fn four_stops() -> Vec<Stop> {
        vec![
            test_stop(1, 1, "A"),
            test_stop(2, 2, "B"),
            test_stop(3, 3, "C"),
            test_stop(4, 4, "D"),
        ]
    }

    /// Costs where swapping the middle stops (B and C) shortens the path
    /// A→B→C→D from 10.0 km to 6.8 km.
    fn swap_provider() -> TableCostProvider {
        let mut provider = TableCostProvider::new();
        provider.insert("A", "B", 4.0, 20.0);
        provider.insert("B", "C", 2.0, 10.0);
        provider.insert("C", "D", 4.0, 20.0);
        provider.insert("A", "C", 2.4, 12.0);
        provider.insert("B", "D", 2.4, 12.0);
        provider.insert("A", "D", 10.0, 50.0);
        provider
    }

    #[test]
    fn test_fewer_than_three_stops_unchanged() {
        let provider = TableCostProvider::new();
        let stops = vec![test_stop(1, 1, "A"), test_stop(2, 2, "B")];

        let result = optimize(&stops, &provider).expect("Optimization should succeed");
        assert_eq!(result.stops, stops);
        assert_eq!(result.distance_saved_km, 0.0);
        assert_eq!(result.time_saved_minutes, 0);
        assert!(!result.improved());
    }

    #[test]
    fn test_swaps_middle_stops_when_shorter() {
        let result =
            optimize(&four_stops(), &swap_provider()).expect("Optimization should succeed");

        let ids: Vec<u64> = result.stops.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);

        // Orders renumbered 1..=4 along the new sequence
        let orders: Vec<u32> = result.stops.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);

        assert!((result.distance_saved_km - 3.2).abs() < 1e-9);
        assert_eq!(result.time_saved_minutes, 16);
        assert!(result.improved());
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let provider = swap_provider();
        let stops = four_stops();

        let first = optimize(&stops, &provider).expect("First run should succeed");
        let second = optimize(&stops, &provider).expect("Second run should succeed");

        assert_eq!(first.stop_ids(), second.stop_ids());
        assert_eq!(first.distance_saved_km, second.distance_saved_km);
        assert_eq!(first.time_saved_minutes, second.time_saved_minutes);
    }

    #[test]
    fn test_already_optimal_order_reports_zero_savings() {
        let mut provider = TableCostProvider::new();
        provider.insert("A", "B", 1.0, 5.0);
        provider.insert("B", "C", 1.0, 5.0);
        provider.insert("C", "D", 1.0, 5.0);
        provider.insert("A", "C", 5.0, 25.0);
        provider.insert("B", "D", 5.0, 25.0);
        provider.insert("A", "D", 9.0, 45.0);

        let stops = four_stops();
        let result = optimize(&stops, &provider).expect("Optimization should succeed");

        // Never a worse order, never negative savings
        assert_eq!(result.stops, stops);
        assert_eq!(result.distance_saved_km, 0.0);
        assert_eq!(result.time_saved_minutes, 0);
    }

    #[test]
    fn test_missing_pair_is_provider_unavailable() {
        let mut provider = TableCostProvider::new();
        provider.insert("A", "B", 1.0, 5.0);

        let stops = vec![
            test_stop(1, 1, "A"),
            test_stop(2, 2, "B"),
            test_stop(3, 3, "C"),
        ];

        match optimize(&stops, &provider) {
            Err(RoundsError::ProviderUnavailable { .. }) => {}
            other => panic!("Expected ProviderUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_first_stop_stays_pinned() {
        let result =
            optimize(&four_stops(), &swap_provider()).expect("Optimization should succeed");
        assert_eq!(result.stops[0].id, 1);
    }
}
