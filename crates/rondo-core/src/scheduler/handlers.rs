//! Handler operations that return formatted wrapper types for the
//! Scheduler.

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, RoundsError},
    models::{Round, RoundFilter},
    params::{DeleteRound, Id, ListRounds},
};

impl Scheduler {
    /// Handle listing rounds as summaries with stop counts.
    ///
    /// Uses the store's summary view so counts are computed in one query,
    /// and returns a display wrapper for consistent list formatting.
    pub async fn list_rounds_summary(
        &self,
        params: &ListRounds,
    ) -> Result<crate::display::RoundSummaries> {
        let filter = RoundFilter::try_from(params)?;
        let db_path = self.db_path.clone();

        let summaries = tokio::task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_round_summaries(Some(&filter))
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::RoundSummaries(summaries))
    }

    /// Handle showing a complete round with all its stops.
    pub async fn show_round(&self, params: &Id) -> Result<Option<Round>> {
        self.get_round(params).await
    }

    /// Handle permanently deleting a round with confirmation.
    ///
    /// Requires explicit confirmation via the `confirmed` field to
    /// prevent accidental deletion. Uses get-before-delete so the deleted
    /// round's details can be shown back to the caller. Returns None when
    /// the round doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RoundsError::InvalidInput` if `confirmed` is false
    pub async fn delete_round(&self, params: &DeleteRound) -> Result<Option<Round>> {
        if !params.confirmed {
            return Err(RoundsError::invalid_input(
                "confirmed",
                "Round deletion requires explicit confirmation. \
                 Set 'confirmed' to true to proceed with permanent deletion.",
            ));
        }

        let id_params = Id { id: params.id };
        let round = self.get_round(&id_params).await?;

        if round.is_some() {
            self.delete_round_by_id(&id_params).await?;
        }

        Ok(round)
    }
}
