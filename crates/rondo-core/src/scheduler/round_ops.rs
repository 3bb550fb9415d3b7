//! Round operations for the Scheduler.

use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, RoundsError},
    models::{Round, RoundFilter},
    params::{CreateRound, Id},
};

impl Scheduler {
    /// Creates a new round in `Planned` state with the given name and
    /// date. The stop list starts empty; stops are added while the round
    /// is still planned.
    pub async fn create_round(&self, params: &CreateRound) -> Result<Round> {
        let date = params.validate()?;
        let db_path = self.db_path.clone();
        let name = params.name.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_round(&name, date)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a round by its ID with stops loaded in travel order.
    pub async fn get_round(&self, params: &Id) -> Result<Option<Round>> {
        let db_path = self.db_path.clone();
        let round_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_round(round_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists rounds in insertion order with optional filtering.
    pub async fn list_rounds(&self, filter: Option<RoundFilter>) -> Result<Vec<Round>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_rounds(filter.as_ref())
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes a round and all its stops.
    /// This operation cannot be undone.
    pub async fn delete_round_by_id(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let round_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_round(round_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
