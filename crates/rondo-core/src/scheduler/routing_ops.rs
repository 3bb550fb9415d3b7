//! Route optimization and itinerary orchestration for the Scheduler.
//!
//! Optimization is best-effort and side-effect free: `optimize_round`
//! only computes, nothing is persisted until `apply_optimization`.
//! Provider failures and timeouts surface as `ProviderUnavailable` and
//! the stored order stays as it was, so cancelling or abandoning an
//! optimization request is always safe.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::task;
use tokio::time::timeout;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, RoundsError},
    models::Round,
    params::Id,
    routing::{self, CostProvider, Itinerary, OptimizedRoute},
};

impl Scheduler {
    /// Computes an optimized travel order for a round's stops.
    ///
    /// The provider is consulted on the blocking pool; no store lock is
    /// held while it runs. When `deadline` is given and expires, the call
    /// behaves exactly like a provider outage.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` - no round with the given id
    /// * `ProviderUnavailable` - provider failure or timeout; the caller
    ///   keeps the original stop order
    pub async fn optimize_round(
        &self,
        params: &Id,
        provider: Arc<dyn CostProvider>,
        deadline: Option<Duration>,
    ) -> Result<OptimizedRoute> {
        let round = self.require_round(params).await?;

        let computation = task::spawn_blocking(move || routing::optimize(&round.stops, &*provider));

        let joined = match deadline {
            Some(limit) => timeout(limit, computation).await.map_err(|_| {
                warn!(
                    "Route optimization for round {} timed out after {limit:?}",
                    params.id
                );
                RoundsError::ProviderUnavailable {
                    reason: format!("Optimization timed out after {limit:?}"),
                }
            })?,
            None => computation.await,
        };

        let result = joined.map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?;

        if let Err(RoundsError::ProviderUnavailable { ref reason }) = result {
            warn!(
                "Route optimization for round {} degraded: {reason}",
                params.id
            );
        }

        result
    }

    /// Persists an optimized travel order, renumbering stop orders 1..=n.
    ///
    /// Allowed while the round is planned or started; a completed round's
    /// sequence is history and stays untouched.
    pub async fn apply_optimization(
        &self,
        params: &Id,
        optimized: &OptimizedRoute,
    ) -> Result<Round> {
        let db_path = self.db_path.clone();
        let round_id = params.id;
        let ordered_ids = optimized.stop_ids();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.reorder_stops(round_id, &ordered_ids)?;
            db.get_round(round_id)?
                .ok_or(RoundsError::RoundNotFound { id: round_id })
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Builds the navigation request for a round's current stop order.
    ///
    /// # Errors
    ///
    /// * `RoundNotFound` - no round with the given id
    /// * `InsufficientStops` - fewer than two stops
    pub async fn itinerary(&self, params: &Id) -> Result<Itinerary> {
        let round = self.require_round(params).await?;
        routing::build_itinerary(&round.stops)
    }

    /// Loads a round, mapping absence to `RoundNotFound`.
    async fn require_round(&self, params: &Id) -> Result<Round> {
        self.get_round(params)
            .await?
            .ok_or(RoundsError::RoundNotFound { id: params.id })
    }
}
