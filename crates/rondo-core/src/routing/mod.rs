//! Route optimization and itinerary building.
//!
//! Everything in this module is pure computation over an ordered stop
//! list: no store access, no persisted intermediate state. Travel costs
//! come from an external distance/duration provider behind the
//! [`CostProvider`] trait, so the optimizer is deterministic and testable
//! without a live mapping API — the same stop list and the same provider
//! responses always produce the same ordering.
//!
//! Optimization is best-effort by design: a provider failure surfaces
//! [`crate::RoundsError::ProviderUnavailable`] and callers keep the
//! original stop order. It is never a hard dependency of starting or
//! completing a round.

pub mod cost;
pub mod itinerary;
pub mod optimize;

pub use cost::{CostProvider, Leg, TableCostProvider};
pub use itinerary::{build_itinerary, Itinerary};
pub use optimize::{optimize, OptimizedRoute};
