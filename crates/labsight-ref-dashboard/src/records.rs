//! Fixture patient records for the reference dashboard.
//!
//! All data is fictional and loaded from the embedded `data/patients.json`.
//! Records are read-only: views derive everything they show from them and
//! never write back.  Lab values stay as the recorded text; only the
//! classifier interprets them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use labsight_contracts::observation::{LabObservation, LabPanel};

/// Display order for the analytes of a lab result row.  Analytes not listed
/// here follow in name order.
pub const PANEL_ORDER: [&str; 4] = ["AFP", "ALT", "AST", "Bilirubin"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub name: String,
    pub age: u32,
    pub gender: String,
    #[serde(default)]
    pub blood_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmokingAlcohol {
    pub smoking: String,
    pub alcohol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub treatment: String,
    pub date: String,
}

/// One blood draw.  `results` maps analyte name to the recorded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub date: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub results: BTreeMap<String, String>,
}

impl LabResult {
    /// The recorded value for `analyte`, if this draw measured it.
    ///
    /// Keys match case-insensitively and ignoring surrounding whitespace, the
    /// same way the rule table matches analyte names.
    pub fn value(&self, analyte: &str) -> Option<&str> {
        let analyte = analyte.trim();
        if let Some(exact) = self.results.get(analyte) {
            return Some(exact.as_str());
        }
        self.results
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(analyte))
            .map(|(_, value)| value.as_str())
    }

    /// This draw as a `LabPanel`, analytes in `PANEL_ORDER` first.
    ///
    /// An unreadable draw date leaves `collected_on` empty rather than
    /// dropping the panel.
    pub fn to_panel(&self) -> LabPanel {
        let collected_on = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok();

        let mut entries: Vec<(&str, &str)> =
            self.results.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        entries.sort_by_key(|(name, _)| {
            let rank = PANEL_ORDER
                .iter()
                .position(|p| p.eq_ignore_ascii_case(name.trim()))
                .unwrap_or(PANEL_ORDER.len());
            (rank, *name)
        });

        let observations = entries
            .into_iter()
            .map(|(name, value)| {
                let obs = LabObservation::new(name, value);
                match collected_on {
                    Some(date) => obs.observed_on(date),
                    None => obs,
                }
            })
            .collect();

        LabPanel { collected_on, observations }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingStudy {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub finding: String,
    #[serde(default)]
    pub useful_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub date: String,
    pub note: String,
}

/// A procedure on the patient's timeline: surgery, diagnostic or consult.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    /// Body region the procedure targeted, e.g. "liver" or "general".
    pub body_part: String,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub date: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgicalHistoryEntry {
    pub date: String,
    pub procedure: String,
}

/// A complete fixture patient.
///
/// `lab_results` and `follow_up` are stored oldest first, as recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub demographics: Demographics,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub smoking_alcohol: SmokingAlcohol,
    #[serde(default)]
    pub family_history: Option<String>,
    pub treatment_plan: TreatmentPlan,
    #[serde(default)]
    pub lab_results: Vec<LabResult>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
    #[serde(default)]
    pub imaging: Vec<ImagingStudy>,
    #[serde(default)]
    pub follow_up: Vec<FollowUp>,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryEntry>,
    #[serde(default)]
    pub surgical_history: Vec<SurgicalHistoryEntry>,
}

impl PatientRecord {
    pub fn latest_lab(&self) -> Option<&LabResult> {
        self.lab_results.last()
    }

    pub fn latest_follow_up(&self) -> Option<&FollowUp> {
        self.follow_up.last()
    }

    /// Recorded allergies, with the "None" placeholder removed.
    pub fn known_allergies(&self) -> Vec<&str> {
        self.allergies
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("none"))
            .collect()
    }
}

/// An upcoming appointment on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u32,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub urgency: String,
}

/// The top-level fixture document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub patients: BTreeMap<String, PatientRecord>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}
