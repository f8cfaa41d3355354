//! Severity tiers and per-value classification results.
//!
//! A `ClassificationResult` is the only thing a view collaborator needs to
//! render a lab value badge: the tier drives colour, the label is shown as
//! text, and `requires_attention` decides whether a warning marker appears.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete severity assigned to a lab value.
///
/// Declaration order is the severity order, so the derived `Ord` gives the
/// total ordering `Normal < Elevated < High < Critical < Unknown`.  `Unknown`
/// sorts last: a value that could not be read outranks every real finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(alias = "normal")]
    Normal,
    #[serde(alias = "elevated")]
    Elevated,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
    #[serde(alias = "unknown")]
    Unknown,
}

impl Tier {
    /// Every tier, lowest severity first.
    pub const ALL: [Tier; 5] = [
        Tier::Normal,
        Tier::Elevated,
        Tier::High,
        Tier::Critical,
        Tier::Unknown,
    ];

    /// Return true if a value in this tier must be flagged to the clinician.
    ///
    /// `Elevated` is shown with its own colour but does not raise a warning
    /// marker; `High` and above do.
    pub fn requires_attention(self) -> bool {
        self >= Tier::High
    }

    /// The more severe of `self` and `other`.
    pub fn worst(self, other: Tier) -> Tier {
        self.max(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Normal => "Normal",
            Tier::Elevated => "Elevated",
            Tier::High => "High",
            Tier::Critical => "Critical",
            Tier::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label used when the raw value could not be read as a number.
pub const UNREADABLE_VALUE_LABEL: &str = "Unreadable value";

/// Label used when no threshold rule exists for the analyte.
pub const UNKNOWN_ANALYTE_LABEL: &str = "Unknown analyte";

/// The outcome of classifying one lab value.
///
/// Serializes to the shape view collaborators consume:
/// `{ "tier": "High", "label": "High Risk", "requiresAttention": true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub tier: Tier,
    /// Human-readable badge text.
    pub label: String,
    /// Always equal to `tier.requires_attention()`.
    pub requires_attention: bool,
}

impl ClassificationResult {
    /// Build a result for `tier`, deriving the attention flag from the tier.
    pub fn new(tier: Tier, label: impl Into<String>) -> Self {
        Self {
            tier,
            label: label.into(),
            requires_attention: tier.requires_attention(),
        }
    }

    /// Result for a value that could not be parsed.
    pub fn unreadable() -> Self {
        Self::new(Tier::Unknown, UNREADABLE_VALUE_LABEL)
    }

    /// Result for an analyte that has no threshold rule.
    pub fn unknown_analyte() -> Self {
        Self::new(Tier::Unknown, UNKNOWN_ANALYTE_LABEL)
    }

    /// Keep whichever of `self` and `other` has the more severe tier.
    ///
    /// Ties keep `self`, so folding a sequence left to right reports the
    /// first result at the worst tier.
    pub fn worse_of(self, other: ClassificationResult) -> ClassificationResult {
        if other.tier > self.tier {
            other
        } else {
            self
        }
    }
}
