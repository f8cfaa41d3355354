//! Core trait definitions for labsight.
//!
//! - `Classifier`: maps (analyte, raw value) to a `ClassificationResult`
//! - `Clock`: supplies "now" to the elapsed-day helpers
//!
//! Both are injected so views and tests never depend on a concrete rule
//! table or on the wall clock.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use labsight_contracts::{observation::LabObservation, tier::ClassificationResult};

/// Name of the canonical ALT/AST joint-evaluation group.
pub const LIVER_FUNCTION_GROUP: &str = "liver-function";

/// A pure lab value classifier.
///
/// Implementations must be deterministic and must never panic: unparseable
/// values and unknown analytes degrade to a `Tier::Unknown` result with the
/// attention flag set.
pub trait Classifier: Send + Sync {
    /// Classify one raw value for the named analyte.
    fn classify(&self, analyte: &str, raw_value: &str) -> ClassificationResult;

    /// Classify several analytes jointly and return the worst result.
    ///
    /// `values` holds `(analyte, raw_value)` pairs.  An unknown group, or a
    /// group evaluated with no values, yields `Tier::Unknown`.
    fn classify_group(&self, group: &str, values: &[(&str, &str)]) -> ClassificationResult;

    fn classify_observation(&self, observation: &LabObservation) -> ClassificationResult {
        self.classify(&observation.analyte, &observation.value)
    }

    /// Joint ALT/AST status: the worse of the two.
    fn classify_liver_function(&self, alt: &str, ast: &str) -> ClassificationResult {
        self.classify_group(LIVER_FUNCTION_GROUP, &[("ALT", alt), ("AST", ast)])
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for reports pinned to a reference date
/// and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at UTC midnight at the start of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
