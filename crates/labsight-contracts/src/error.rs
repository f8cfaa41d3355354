//! Error types for the labsight workspace.
//!
//! Classification itself never fails: bad values and unknown analytes
//! degrade to an `Unknown` result.  These errors cover the fallible edges
//! around it: loading rule tables and fixtures, and caller lookups.

use thiserror::Error;

/// The unified error type for labsight.
#[derive(Debug, Error)]
pub enum LabsightError {
    /// A rule table is malformed or fails validation.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Embedded or on-disk fixture data could not be loaded.
    #[error("fixture error: {reason}")]
    FixtureError { reason: String },

    /// No patient record exists for the requested id.
    #[error("patient '{patient_id}' not found")]
    PatientNotFound { patient_id: String },

    /// A date string could not be interpreted.
    #[error("invalid date '{input}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate { input: String },
}

/// Convenience alias used throughout the labsight crates.
pub type LabsightResult<T> = Result<T, LabsightError>;
