//! TOML-driven rule table implementation.
//!
//! `TomlRuleTable` loads a `RuleTableConfig` from a TOML string or file,
//! validates it, and implements the `Classifier` trait from labsight-core.
//!
//! Classification algorithm:
//!
//! 1. Look up the rule whose analyte name or alias matches (case-insensitive).
//!    No rule → `Unknown` ("Unknown analyte").
//! 2. Parse the raw value with `parse_lab_value`.
//!    Failure → `Unknown` ("Unreadable value").
//! 3. Test the rule's bands highest bound first; the first band admitting the
//!    value wins.  No band → `Normal` with the rule's `normal_label`.
//!
//! None of these steps can fail the caller.  Errors exist only at load time.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use labsight_contracts::{
    error::{LabsightError, LabsightResult},
    tier::{ClassificationResult, Tier},
};
use labsight_core::traits::Classifier;

use crate::rule::{RuleGroup, RuleTableConfig, ThresholdRule};
use crate::value::parse_lab_value;

/// The canonical rule set shipped with the crate.
const CANONICAL_RULES: &str = include_str!("../rules/canonical.toml");

/// Label for a joint evaluation against a group that does not exist.
pub const UNKNOWN_GROUP_LABEL: &str = "Unknown group";

/// Label for a joint evaluation that was given no values.
pub const EMPTY_GROUP_LABEL: &str = "No values";

/// A `Classifier` backed by a validated rule table.
///
/// ```rust,ignore
/// use labsight_rules::TomlRuleTable;
/// use labsight_core::traits::Classifier;
///
/// let table = TomlRuleTable::canonical()?;
/// let afp = table.classify("AFP", "450");
/// ```
#[derive(Debug, Clone)]
pub struct TomlRuleTable {
    config: RuleTableConfig,
}

impl TomlRuleTable {
    /// The embedded canonical thresholds.
    pub fn canonical() -> LabsightResult<Self> {
        Self::from_toml_str(CANONICAL_RULES)
    }

    /// Parse `s` as TOML and build a validated rule table.
    ///
    /// Returns `LabsightError::ConfigError` if the TOML is malformed, does
    /// not match `RuleTableConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> LabsightResult<Self> {
        let config: RuleTableConfig = toml::from_str(s).map_err(|e| LabsightError::ConfigError {
            reason: format!("failed to parse rule table TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a rule table.
    pub fn from_file(path: &Path) -> LabsightResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LabsightError::ConfigError {
            reason: format!("failed to read rule table '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate `config` and order every rule's bands highest bound first.
    pub fn from_config(mut config: RuleTableConfig) -> LabsightResult<Self> {
        validate(&config)?;
        for rule in &mut config.rules {
            rule.sort_bands();
        }
        info!(
            rules = config.rules.len(),
            groups = config.groups.len(),
            "rule table loaded"
        );
        Ok(Self { config })
    }

    /// Find the rule for `name`, matching analyte names and aliases.
    pub fn rule_for(&self, name: &str) -> Option<&ThresholdRule> {
        self.config.rules.iter().find(|rule| rule.answers_to(name))
    }

    /// Find a joint-evaluation group by name (case-insensitive).
    pub fn group(&self, name: &str) -> Option<&RuleGroup> {
        let name = name.trim();
        self.config.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.config.rules
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.config.groups
    }

    pub fn config(&self) -> &RuleTableConfig {
        &self.config
    }
}

impl Classifier for TomlRuleTable {
    fn classify(&self, analyte: &str, raw_value: &str) -> ClassificationResult {
        let Some(rule) = self.rule_for(analyte) else {
            warn!(analyte = %analyte, "no threshold rule for analyte");
            return ClassificationResult::unknown_analyte();
        };

        let value = match parse_lab_value(raw_value) {
            Ok(v) => v,
            Err(e) => {
                warn!(analyte = %rule.analyte, raw_value = %raw_value, error = %e, "unreadable lab value");
                return ClassificationResult::unreadable();
            }
        };

        let result = rule.evaluate(value);
        debug!(
            analyte = %rule.analyte,
            value,
            tier = %result.tier,
            label = %result.label,
            "value classified"
        );
        result
    }

    /// Classify every pair and report the worst.
    ///
    /// A pair whose analyte is not a member of the group is reported as
    /// `Unknown` instead of being evaluated, so a caller passing the wrong
    /// values sees it immediately.
    fn classify_group(&self, group: &str, values: &[(&str, &str)]) -> ClassificationResult {
        let Some(found) = self.group(group) else {
            warn!(group = %group, "no rule group with this name");
            return ClassificationResult::new(Tier::Unknown, UNKNOWN_GROUP_LABEL);
        };

        let members: Vec<&ThresholdRule> =
            found.members.iter().filter_map(|m| self.rule_for(m)).collect();

        let worst = values
            .iter()
            .map(|(analyte, raw)| {
                let is_member = self
                    .rule_for(analyte)
                    .is_some_and(|rule| members.iter().any(|m| m.analyte == rule.analyte));
                if is_member {
                    self.classify(analyte, raw)
                } else {
                    warn!(group = %found.name, analyte = %analyte, "analyte is not a member of group");
                    ClassificationResult::unknown_analyte()
                }
            })
            .reduce(ClassificationResult::worse_of);

        match worst {
            Some(result) => {
                debug!(group = %found.name, tier = %result.tier, "group classified");
                result
            }
            None => {
                warn!(group = %found.name, "group evaluated with no values");
                ClassificationResult::new(Tier::Unknown, EMPTY_GROUP_LABEL)
            }
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

fn config_error(reason: String) -> LabsightError {
    LabsightError::ConfigError { reason }
}

fn validate(config: &RuleTableConfig) -> LabsightResult<()> {
    let mut seen_names: HashSet<String> = HashSet::new();

    for rule in &config.rules {
        if rule.analyte.trim().is_empty() {
            return Err(config_error("rule with empty analyte name".to_string()));
        }

        if rule.aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(config_error(format!(
                "rule '{}' declares an empty alias",
                rule.analyte
            )));
        }

        for name in rule.names() {
            if !seen_names.insert(name.trim().to_ascii_lowercase()) {
                return Err(config_error(format!(
                    "analyte name '{}' is declared more than once",
                    name
                )));
            }
        }

        let mut seen_bounds = Vec::new();
        for (i, band) in rule.bands.iter().enumerate() {
            let Some(bound) = band.bound() else {
                return Err(config_error(format!(
                    "band {} of '{}' must set exactly one of 'above' or 'at_least'",
                    i, rule.analyte
                )));
            };
            if !bound.value().is_finite() {
                return Err(config_error(format!(
                    "band {} of '{}' has a non-finite bound",
                    i, rule.analyte
                )));
            }
            if band.tier == Tier::Unknown {
                return Err(config_error(format!(
                    "band {} of '{}' cannot use tier Unknown",
                    i, rule.analyte
                )));
            }
            if seen_bounds.contains(&bound) {
                return Err(config_error(format!(
                    "'{}' has two bands with bound {:?}",
                    rule.analyte, bound
                )));
            }
            seen_bounds.push(bound);
        }
    }

    let mut seen_groups: HashSet<String> = HashSet::new();
    for group in &config.groups {
        if !seen_groups.insert(group.name.trim().to_ascii_lowercase()) {
            return Err(config_error(format!(
                "group '{}' is declared more than once",
                group.name
            )));
        }
        if group.members.is_empty() {
            return Err(config_error(format!("group '{}' has no members", group.name)));
        }
        for member in &group.members {
            if member.trim().is_empty() {
                return Err(config_error(format!(
                    "group '{}' has an empty member name",
                    group.name
                )));
            }
            if !config.rules.iter().any(|r| r.answers_to(member)) {
                return Err(config_error(format!(
                    "group '{}' names '{}' which has no rule",
                    group.name, member
                )));
            }
        }
    }

    Ok(())
}
