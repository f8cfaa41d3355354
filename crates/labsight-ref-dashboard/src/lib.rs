//! # labsight-ref-dashboard
//!
//! Reference dashboard runtime for the labsight classifier.
//!
//! Loads fictional fixture patients and derives what the dashboard pages
//! display from them:
//!
//! 1. **Patient card**: latest AFP status, joint ALT/AST status, allergies,
//!    days since the last follow-up.
//! 2. **Lab history**: every draw classified per analyte.
//! 3. **Patient detail**: card, lab history, procedures, imaging and the
//!    medical and surgical history.
//! 4. **Dashboard summary**: patients needing attention and appointments by
//!    urgency.
//!
//! All data is hardcoded and fictional.  No external systems are contacted.

pub mod records;
pub mod registry;
pub mod views;

pub use registry::PatientRegistry;
pub use views::{
    dashboard_summary, lab_history, patient_card, patient_detail, DashboardSummary, LabHistoryRow,
    PatientCard, PatientDetail,
};
