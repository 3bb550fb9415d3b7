//! Patient directory collaborator.
//!
//! The patient record system is external to this crate; the scheduler only
//! consults it once, at stop-creation time, to snapshot the patient's name
//! and address into the new stop. Later changes to the record never touch
//! existing stops.

use std::collections::HashMap;

use crate::error::{Result, RoundsError};

/// The name/address snapshot returned by a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub name: String,
    pub address: String,
}

/// Lookup interface onto the external patient record system.
pub trait PatientDirectory: Send + Sync {
    /// Resolves a patient ID to its current name and address.
    ///
    /// # Errors
    ///
    /// Returns `RoundsError::InvalidInput` when the patient is unknown.
    fn lookup(&self, patient_id: &str) -> Result<PatientRecord>;
}

/// In-memory directory backed by a fixed map of patients.
///
/// Serves tests and demo setups; a production deployment implements
/// [`PatientDirectory`] against the real record store.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    patients: HashMap<String, PatientRecord>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a patient under the given ID, replacing any previous
    /// entry.
    pub fn insert(
        &mut self,
        patient_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) {
        self.patients.insert(
            patient_id.into(),
            PatientRecord {
                name: name.into(),
                address: address.into(),
            },
        );
    }
}

impl PatientDirectory for StaticDirectory {
    fn lookup(&self, patient_id: &str) -> Result<PatientRecord> {
        self.patients.get(patient_id).cloned().ok_or_else(|| {
            RoundsError::invalid_input("patient_id", format!("Unknown patient '{patient_id}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_directory_lookup() {
        let mut directory = StaticDirectory::new();
        directory.insert("p-1", "Jo Miller", "12 Elm Street");

        let record = directory.lookup("p-1").expect("Lookup should succeed");
        assert_eq!(record.name, "Jo Miller");
        assert_eq!(record.address, "12 Elm Street");
    }

    #[test]
    fn test_static_directory_unknown_patient() {
        let directory = StaticDirectory::new();
        assert!(directory.lookup("p-404").is_err());
    }
}
