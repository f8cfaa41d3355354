//! Lab observations and panel-level reports.
//!
//! A `LabObservation` is what a data source hands the classifier: an analyte
//! name and the value exactly as it was recorded (text, possibly with a unit
//! glued on).  A `LabPanel` groups the observations drawn on one date; the
//! `PanelReport` is what comes back after every observation was classified.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tier::{ClassificationResult, Tier};

/// A single raw lab value.
///
/// JSON shape: `{ "analyte": "AFP", "value": "450", "unit": "ng/mL" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabObservation {
    /// Analyte name as recorded, e.g. "AFP" or "Bilirubin".
    pub analyte: String,
    /// The raw recorded value.  Parsed only at classification time.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, rename = "date", skip_serializing_if = "Option::is_none")]
    pub observed_on: Option<NaiveDate>,
}

impl LabObservation {
    pub fn new(analyte: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            analyte: analyte.into(),
            value: value.into(),
            unit: None,
            observed_on: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn observed_on(mut self, date: NaiveDate) -> Self {
        self.observed_on = Some(date);
        self
    }
}

/// Observations collected together, typically one blood draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_on: Option<NaiveDate>,
    pub observations: Vec<LabObservation>,
}

/// One observation paired with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationReport {
    pub observation: LabObservation,
    pub result: ClassificationResult,
}

/// The classification of a whole `LabPanel`.
///
/// `observations` preserves the panel's input order.  `worst_tier` is the
/// maximum tier across all observations, `Normal` for an empty panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_on: Option<NaiveDate>,
    pub observations: Vec<ObservationReport>,
    pub worst_tier: Tier,
    pub requires_attention: bool,
}

impl PanelReport {
    /// Observations whose result requires attention, in panel order.
    pub fn flagged(&self) -> impl Iterator<Item = &ObservationReport> {
        self.observations.iter().filter(|r| r.result.requires_attention)
    }
}
