//! Derived presentation values for the dashboard pages.
//!
//! Each function takes a record plus the injected `Classifier` and `Clock`
//! and returns a plain serializable view model.  No thresholds are defined
//! here; every status comes from the classifier.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use labsight_contracts::{observation::PanelReport, tier::ClassificationResult};
use labsight_core::{
    elapsed::{days_since_str, parse_instant},
    panel::PanelEvaluator,
    traits::{Classifier, Clock},
};

use crate::records::{
    Appointment, ImagingStudy, MedicalHistoryEntry, PatientRecord, Procedure, SmokingAlcohol,
    SurgicalHistoryEntry,
};
use crate::registry::PatientRegistry;

/// The patient list card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCard {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub treatment: String,
    pub treatment_year: Option<i32>,
    pub latest_lab_date: Option<String>,
    pub afp_value: Option<String>,
    pub afp: Option<ClassificationResult>,
    pub liver_function: Option<ClassificationResult>,
    pub allergies: Vec<String>,
    pub latest_follow_up: Option<String>,
    pub days_since_follow_up: Option<u64>,
    pub requires_attention: bool,
}

/// One row of the lab history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabHistoryRow {
    pub date: String,
    pub kind: Option<String>,
    pub panel: PanelReport,
    /// Present only when the draw measured both ALT and AST.
    pub liver_function: Option<ClassificationResult>,
}

/// The full patient page: the card, every classified draw, and the clinical
/// history the record carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetail {
    pub card: PatientCard,
    pub labs: Vec<LabHistoryRow>,
    pub blood_type: Option<String>,
    pub smoking_alcohol: SmokingAlcohol,
    pub family_history: Option<String>,
    pub procedures: Vec<Procedure>,
    /// Procedure count per body part, keyed lowercase.
    pub procedures_by_body_part: BTreeMap<String, usize>,
    pub imaging: Vec<ImagingStudy>,
    pub medical_history: Vec<MedicalHistoryEntry>,
    pub surgical_history: Vec<SurgicalHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_patients: usize,
    /// Ids of patients whose card requires attention, in id order.
    pub attention: Vec<String>,
    pub appointments_by_urgency: BTreeMap<String, usize>,
    pub appointments: Vec<Appointment>,
}

/// Build the card for `record` from its latest lab draw and follow-up.
pub fn patient_card(
    record: &PatientRecord,
    classifier: &dyn Classifier,
    clock: &dyn Clock,
) -> PatientCard {
    let latest_lab = record.latest_lab();
    let afp_value = latest_lab.and_then(|lab| lab.value("AFP"));
    let afp = afp_value.map(|v| classifier.classify("AFP", v));
    let liver_function = latest_lab.and_then(|lab| {
        Some(classifier.classify_liver_function(lab.value("ALT")?, lab.value("AST")?))
    });

    let requires_attention = afp.iter().chain(liver_function.iter()).any(|r| r.requires_attention);

    let latest_follow_up = record.latest_follow_up();

    PatientCard {
        id: record.id.clone(),
        name: record.demographics.name.clone(),
        age: record.demographics.age,
        gender: record.demographics.gender.clone(),
        treatment: record.treatment_plan.treatment.clone(),
        treatment_year: parse_instant(&record.treatment_plan.date).ok().map(|dt| dt.year()),
        latest_lab_date: latest_lab.map(|lab| lab.date.clone()),
        afp_value: afp_value.map(str::to_string),
        afp,
        liver_function,
        allergies: record.known_allergies().into_iter().map(str::to_string).collect(),
        latest_follow_up: latest_follow_up.map(|f| f.note.clone()),
        days_since_follow_up: latest_follow_up.and_then(|f| days_since_str(&f.date, clock)),
        requires_attention,
    }
}

/// Every lab draw of `record`, oldest first, fully classified.
pub fn lab_history(record: &PatientRecord, classifier: &dyn Classifier) -> Vec<LabHistoryRow> {
    let evaluator = PanelEvaluator::new(classifier);
    record
        .lab_results
        .iter()
        .map(|lab| LabHistoryRow {
            date: lab.date.clone(),
            kind: lab.kind.clone(),
            panel: evaluator.evaluate(&lab.to_panel()),
            liver_function: lab
                .value("ALT")
                .zip(lab.value("AST"))
                .map(|(alt, ast)| classifier.classify_liver_function(alt, ast)),
        })
        .collect()
}

/// Build the patient page for `record`.
///
/// Procedures are listed newest first; every other history list keeps the
/// recorded order.
pub fn patient_detail(
    record: &PatientRecord,
    classifier: &dyn Classifier,
    clock: &dyn Clock,
) -> PatientDetail {
    let mut procedures = record.procedures.clone();
    procedures.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    let mut procedures_by_body_part = BTreeMap::new();
    for procedure in &procedures {
        let part = procedure.body_part.trim().to_ascii_lowercase();
        *procedures_by_body_part.entry(part).or_insert(0) += 1;
    }

    PatientDetail {
        card: patient_card(record, classifier, clock),
        labs: lab_history(record, classifier),
        blood_type: record.demographics.blood_type.clone(),
        smoking_alcohol: record.smoking_alcohol.clone(),
        family_history: record.family_history.clone(),
        procedures,
        procedures_by_body_part,
        imaging: record.imaging.clone(),
        medical_history: record.medical_history.clone(),
        surgical_history: record.surgical_history.clone(),
    }
}

/// Registry-wide counts for the dashboard landing page.
pub fn dashboard_summary(
    registry: &PatientRegistry,
    classifier: &dyn Classifier,
    clock: &dyn Clock,
) -> DashboardSummary {
    let attention = registry
        .patients()
        .map(|record| patient_card(record, classifier, clock))
        .filter(|card| card.requires_attention)
        .map(|card| card.id)
        .collect();

    let appointments: Vec<Appointment> = registry.appointments().into_iter().cloned().collect();
    let mut appointments_by_urgency = BTreeMap::new();
    for appointment in &appointments {
        *appointments_by_urgency.entry(appointment.urgency.clone()).or_insert(0) += 1;
    }

    DashboardSummary {
        total_patients: registry.len(),
        attention,
        appointments_by_urgency,
        appointments,
    }
}
