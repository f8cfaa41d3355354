//! # labsight-contracts
//!
//! Shared types and error contracts for the labsight classifier.
//!
//! Every other crate in the workspace imports from here.  No threshold
//! logic lives in this crate, only the data that flows between the rule
//! table, the panel evaluator, and view collaborators.

pub mod error;
pub mod observation;
pub mod tier;

pub use error::{LabsightError, LabsightResult};
pub use observation::{LabObservation, LabPanel, ObservationReport, PanelReport};
pub use tier::{ClassificationResult, Tier};
