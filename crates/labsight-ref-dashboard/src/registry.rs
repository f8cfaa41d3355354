//! Read-only patient registry over the fixture data.
//!
//! Lookup by id is explicit: `find` returns `Option` and `get` returns a
//! `PatientNotFound` error.  Nothing indexes the record set directly.

use tracing::{debug, info};

use labsight_contracts::error::{LabsightError, LabsightResult};

use crate::records::{Appointment, FixtureData, PatientRecord};

/// Embedded fictional fixture data.
const EMBEDDED_FIXTURES: &str = include_str!("../data/patients.json");

#[derive(Debug, Clone)]
pub struct PatientRegistry {
    data: FixtureData,
}

impl PatientRegistry {
    /// The registry over the embedded fixture file.
    pub fn embedded() -> LabsightResult<Self> {
        Self::from_json_str(EMBEDDED_FIXTURES)
    }

    /// Parse a fixture document.
    ///
    /// Returns `LabsightError::FixtureError` if the JSON is malformed or a
    /// patient's map key disagrees with its `id` field.
    pub fn from_json_str(s: &str) -> LabsightResult<Self> {
        let data: FixtureData = serde_json::from_str(s).map_err(|e| LabsightError::FixtureError {
            reason: format!("failed to parse fixture JSON: {}", e),
        })?;

        if let Some((key, record)) = data.patients.iter().find(|(key, rec)| **key != rec.id) {
            return Err(LabsightError::FixtureError {
                reason: format!("patient keyed '{}' has id '{}'", key, record.id),
            });
        }

        info!(
            patients = data.patients.len(),
            appointments = data.appointments.len(),
            "fixture data loaded"
        );
        Ok(Self { data })
    }

    /// Look up a patient by id.
    pub fn find(&self, patient_id: &str) -> Option<&PatientRecord> {
        let found = self.data.patients.get(patient_id.trim());
        if found.is_none() {
            debug!(patient_id = %patient_id, "patient not in registry");
        }
        found
    }

    /// Like `find`, but a miss is an error.
    pub fn get(&self, patient_id: &str) -> LabsightResult<&PatientRecord> {
        self.find(patient_id).ok_or_else(|| LabsightError::PatientNotFound {
            patient_id: patient_id.to_string(),
        })
    }

    /// All patients in id order.
    pub fn patients(&self) -> impl Iterator<Item = &PatientRecord> {
        self.data.patients.values()
    }

    pub fn len(&self) -> usize {
        self.data.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.patients.is_empty()
    }

    /// Appointments sorted by date, then time.
    pub fn appointments(&self) -> Vec<&Appointment> {
        let mut appointments: Vec<&Appointment> = self.data.appointments.iter().collect();
        appointments.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
        appointments
    }
}
