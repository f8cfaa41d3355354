//! Threshold rule types and rule table schema.
//!
//! A `RuleTableConfig` is deserialized from TOML and holds one
//! `ThresholdRule` per analyte plus any joint-evaluation `RuleGroup`s.
//! Within a rule, bands are evaluated highest bound first and the first
//! band that admits the value wins.  A value no band admits is `Normal`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use labsight_contracts::tier::{ClassificationResult, Tier};

/// The lower bound of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Admits values strictly greater than the bound.
    Above(f64),
    /// Admits values greater than or equal to the bound.
    AtLeast(f64),
}

impl Bound {
    pub fn value(self) -> f64 {
        match self {
            Bound::Above(v) | Bound::AtLeast(v) => v,
        }
    }

    pub fn admits(self, value: f64) -> bool {
        match self {
            Bound::Above(b) => value > b,
            Bound::AtLeast(b) => value >= b,
        }
    }

    /// Order bounds by how much they demand of a value.
    ///
    /// Higher values rank higher; at an equal value `Above` ranks over
    /// `AtLeast`, since it admits strictly fewer values.
    pub fn strictness_cmp(self, other: Bound) -> Ordering {
        let kind = |b: Bound| match b {
            Bound::AtLeast(_) => 0,
            Bound::Above(_) => 1,
        };
        self.value()
            .total_cmp(&other.value())
            .then_with(|| kind(self).cmp(&kind(other)))
    }
}

/// One band of a threshold rule.
///
/// Exactly one of `above` / `at_least` must be set.  In TOML:
///
/// ```toml
/// bands = [
///     { above = 400.0, tier = "High", label = "High Risk" },
///     { at_least = 200.0, tier = "Elevated" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<f64>,

    pub tier: Tier,

    /// Badge text.  Defaults to the tier name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Band {
    /// The band's bound, or `None` when neither or both bounds are set.
    pub fn bound(&self) -> Option<Bound> {
        match (self.above, self.at_least) {
            (Some(v), None) => Some(Bound::Above(v)),
            (None, Some(v)) => Some(Bound::AtLeast(v)),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.tier.as_str())
    }
}

fn default_normal_label() -> String {
    "Normal".to_string()
}

/// The thresholds for one analyte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Canonical analyte name, e.g. "AFP".  Matched case-insensitively.
    pub analyte: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit the thresholds are expressed in.  Informational only; values
    /// are never converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Other names this analyte is recorded under.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Label for values that fall through every band.
    #[serde(default = "default_normal_label")]
    pub normal_label: String,

    /// Ordered highest bound first once loaded by `TomlRuleTable`.
    #[serde(default)]
    pub bands: Vec<Band>,
}

impl ThresholdRule {
    /// The analyte name followed by its aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.analyte.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Return true if `name` refers to this analyte.
    ///
    /// Comparison ignores ASCII case and surrounding whitespace.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.names().any(|n| n.trim().eq_ignore_ascii_case(name))
    }

    /// Classify a parsed value.
    ///
    /// Bands are tested in order and the first that admits `value` wins, so
    /// the bands must already be sorted highest bound first.
    pub fn evaluate(&self, value: f64) -> ClassificationResult {
        self.bands
            .iter()
            .find(|band| band.bound().is_some_and(|b| b.admits(value)))
            .map(|band| ClassificationResult::new(band.tier, band.label()))
            .unwrap_or_else(|| ClassificationResult::new(Tier::Normal, self.normal_label.as_str()))
    }

    /// Sort bands highest bound first.  Bands without a valid bound sink to
    /// the end; the loader rejects them before this matters.
    pub(crate) fn sort_bands(&mut self) {
        self.bands.sort_by(|a, b| match (a.bound(), b.bound()) {
            (Some(x), Some(y)) => y.strictness_cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

/// Analytes classified together, reporting the worst member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Analyte names (or aliases) of the member rules.
    pub members: Vec<String>,
}

/// The top-level structure deserialized from a rule table TOML file.
///
/// ```toml
/// [[rules]]
/// analyte = "Bilirubin"
/// unit = "mg/dL"
/// bands = [{ above = 2.0, tier = "Elevated" }]
///
/// [[groups]]
/// name = "liver-function"
/// members = ["ALT", "AST"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTableConfig {
    #[serde(default)]
    pub rules: Vec<ThresholdRule>,

    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}
