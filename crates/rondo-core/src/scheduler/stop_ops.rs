//! Stop-set operations for the Scheduler.
//!
//! Stops can only be added or removed while the owning round is planned;
//! the store enforces the precondition inside its transaction.

use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    directory::PatientDirectory,
    error::{Result, RoundsError},
    models::Stop,
    params::{AddStop, AddStopForPatient, Id, StopRef},
};

impl Scheduler {
    /// Adds a stop to a planned round from an explicit patient snapshot.
    pub async fn add_stop(&self, params: &AddStop) -> Result<Stop> {
        let scheduled_time = params.validate()?;
        let db_path = self.db_path.clone();
        let round_id = params.round_id;
        let patient_name = params.patient_name.clone();
        let patient_address = params.patient_address.clone();
        let care_label = params.care_label.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_stop(
                round_id,
                &patient_name,
                &patient_address,
                scheduled_time,
                &care_label,
            )
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Adds a stop to a planned round, snapshotting the patient's name
    /// and address from the directory collaborator.
    pub async fn add_stop_for_patient(
        &self,
        params: &AddStopForPatient,
        directory: &dyn PatientDirectory,
    ) -> Result<Stop> {
        let record = directory.lookup(&params.patient_id)?;

        self.add_stop(&AddStop {
            round_id: params.round_id,
            patient_name: record.name,
            patient_address: record.address,
            scheduled_time: params.scheduled_time.clone(),
            care_label: params.care_label.clone(),
        })
        .await
    }

    /// Removes a stop from a planned round, renumbering the remaining
    /// stops contiguously.
    pub async fn remove_stop(&self, params: &StopRef) -> Result<()> {
        let db_path = self.db_path.clone();
        let round_id = params.round_id;
        let stop_id = params.stop_id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.remove_stop(round_id, stop_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves all stops of a round in travel order.
    pub async fn get_stops(&self, params: &Id) -> Result<crate::display::Stops> {
        let db_path = self.db_path.clone();
        let round_id = params.id;

        let stops = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_stops(round_id)
        })
        .await
        .map_err(|e| RoundsError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(crate::display::Stops(stops))
    }
}
