//! # labsight-rules
//!
//! The canonical lab threshold rule table for labsight.
//!
//! ## Overview
//!
//! This crate provides [`TomlRuleTable`], which implements the
//! [`Classifier`](labsight_core::traits::Classifier) trait.  Thresholds are
//! declared once in TOML, one rule per analyte, so no view ever redefines a
//! cutoff locally.  The canonical set ships embedded and is available from
//! [`TomlRuleTable::canonical`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use labsight_core::traits::Classifier;
//! use labsight_rules::TomlRuleTable;
//!
//! let table = TomlRuleTable::canonical()?;
//! assert_eq!(table.classify("AFP", "401").label, "High Risk");
//! ```
//!
//! ## Rule matching
//!
//! Analyte names match case-insensitively, including declared aliases.
//! Bands are evaluated highest bound first; the first band admitting the
//! value wins.

pub mod engine;
pub mod rule;
pub mod value;

pub use engine::TomlRuleTable;
pub use rule::{Band, Bound, RuleGroup, RuleTableConfig, ThresholdRule};
pub use value::{parse_lab_value, ValueParseError};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use labsight_contracts::{
        error::LabsightError,
        observation::LabObservation,
        tier::{ClassificationResult, Tier},
    };
    use labsight_core::traits::Classifier;

    use crate::TomlRuleTable;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn canonical() -> TomlRuleTable {
        TomlRuleTable::canonical().expect("embedded canonical rules must load")
    }

    fn tier(analyte: &str, value: &str) -> Tier {
        canonical().classify(analyte, value).tier
    }

    /// Assert that loading `toml` fails with a ConfigError mentioning `needle`.
    fn assert_config_error(toml: &str, needle: &str) {
        match TomlRuleTable::from_toml_str(toml) {
            Err(LabsightError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. canonical thresholds ───────────────────────────────────────────────

    #[test]
    fn afp_tiers() {
        let table = canonical();

        let high = table.classify("AFP", "401");
        assert_eq!(high.tier, Tier::High);
        assert_eq!(high.label, "High Risk");
        assert!(high.requires_attention);

        assert_eq!(tier("AFP", "400"), Tier::Elevated);
        assert_eq!(tier("AFP", "250"), Tier::Elevated);
        assert_eq!(tier("AFP", "200"), Tier::Normal);
        assert_eq!(tier("AFP", "150"), Tier::Normal);
    }

    #[test]
    fn liver_enzyme_tiers() {
        assert_eq!(tier("ALT", "101"), Tier::Critical);
        assert_eq!(tier("ALT", "100"), Tier::Elevated);
        assert_eq!(tier("AST", "81"), Tier::Elevated);
        assert_eq!(tier("AST", "80"), Tier::Normal);
    }

    #[test]
    fn bilirubin_boundary_is_exclusive() {
        assert_eq!(tier("Bilirubin", "2.1"), Tier::Elevated);
        assert_eq!(tier("Bilirubin", "2.0"), Tier::Normal);
        assert_eq!(tier("Bilirubin", "0.9"), Tier::Normal);
        assert!(!canonical().classify("Bilirubin", "3.5").requires_attention);
    }

    // ── 2. joint liver function ───────────────────────────────────────────────

    #[test]
    fn liver_function_reports_worst_enzyme() {
        let table = canonical();

        assert_eq!(table.classify_liver_function("101", "40").tier, Tier::Critical);
        assert_eq!(table.classify_liver_function("40", "85").tier, Tier::Elevated);
        assert_eq!(table.classify_liver_function("40", "35").tier, Tier::Normal);
        assert_eq!(table.classify_liver_function("120", "90").tier, Tier::Critical);
    }

    #[test]
    fn liver_function_surfaces_unreadable_enzyme() {
        let result = canonical().classify_liver_function("150", "pending");
        assert_eq!(result.tier, Tier::Unknown);
        assert!(result.requires_attention);
    }

    #[test]
    fn group_rejects_non_members_and_unknown_groups() {
        let table = canonical();

        let result = table.classify_group("liver-function", &[("AFP", "10")]);
        assert_eq!(result.tier, Tier::Unknown);

        let result = table.classify_group("renal", &[("ALT", "10")]);
        assert_eq!(result.tier, Tier::Unknown);
        assert_eq!(result.label, crate::engine::UNKNOWN_GROUP_LABEL);

        let result = table.classify_group("liver-function", &[]);
        assert_eq!(result.tier, Tier::Unknown);
        assert_eq!(result.label, crate::engine::EMPTY_GROUP_LABEL);
    }

    // ── 3. degradation ────────────────────────────────────────────────────────

    #[test]
    fn unparseable_value_is_unknown() {
        let result = canonical().classify("AFP", "not-a-number");
        assert_eq!(result, ClassificationResult::unreadable());
        assert!(result.requires_attention);
    }

    #[test]
    fn unknown_analyte_is_unknown() {
        let result = canonical().classify("Creatinine", "1.1");
        assert_eq!(result, ClassificationResult::unknown_analyte());
        assert!(result.requires_attention);
    }

    #[test]
    fn analyte_names_ignore_case_and_aliases_resolve() {
        assert_eq!(tier("afp", "401"), Tier::High);
        assert_eq!(tier("  Alpha-Fetoprotein ", "401"), Tier::High);
        assert_eq!(tier("BILIRUBIN", "2.5"), Tier::Elevated);
        assert_eq!(tier("Total Bilirubin", "2.5"), Tier::Elevated);
    }

    #[test]
    fn values_with_units_classify() {
        assert_eq!(tier("AFP", "450 ng/mL"), Tier::High);
        assert_eq!(tier("Bilirubin", "2.4mg/dL"), Tier::Elevated);
        assert_eq!(tier("AFP", "1,200"), Tier::Unknown);
        assert_eq!(tier("AFP", "4.5e2"), Tier::High);
        assert_eq!(tier("AFP", "1 200"), Tier::Unknown);
        assert!(canonical().classify("AFP", "1 200").requires_attention);
    }

    #[test]
    fn classify_observation_uses_analyte_and_value() {
        let obs = LabObservation::new("ALT", "105").with_unit("U/L");
        assert_eq!(canonical().classify_observation(&obs).tier, Tier::Critical);
    }

    #[test]
    fn classification_is_deterministic() {
        let table = canonical();
        for (analyte, value) in [("AFP", "401"), ("ALT", "85"), ("Bilirubin", "x"), ("Foo", "1")] {
            let first = table.classify(analyte, value);
            for _ in 0..10 {
                assert_eq!(table.classify(analyte, value), first);
            }
        }
    }

    // ── 4. table loading ──────────────────────────────────────────────────────

    #[test]
    fn rule_lookup_is_explicit() {
        let table = canonical();
        assert_eq!(table.rule_for("ast").map(|r| r.analyte.as_str()), Some("AST"));
        assert_eq!(table.rule_for("AST").and_then(|r| r.unit.as_deref()), Some("U/L"));
        assert!(table.rule_for("GGT").is_none());
        assert_eq!(table.rules().len(), 4);
        assert!(table.group("Liver-Function").is_some());
    }

    #[test]
    fn bands_are_sorted_highest_first_on_load() {
        let toml = r#"
            [[rules]]
            analyte = "CRP"
            bands = [
                { above = 10.0, tier = "Elevated" },
                { at_least = 100.0, tier = "Critical" },
                { above = 50.0, tier = "High", label = "Inflamed" },
            ]
        "#;

        let table = TomlRuleTable::from_toml_str(toml).unwrap();
        let bounds: Vec<f64> = table.rule_for("CRP").unwrap().bands.iter()
            .filter_map(|b| b.bound())
            .map(|b| b.value())
            .collect();
        assert_eq!(bounds, vec![100.0, 50.0, 10.0]);

        assert_eq!(table.classify("CRP", "100").tier, Tier::Critical);
        assert_eq!(table.classify("CRP", "60").label, "Inflamed");
        assert_eq!(table.classify("CRP", "11").label, "Elevated");
        assert_eq!(table.classify("CRP", "10").label, "Normal");
    }

    #[test]
    fn inclusive_and_exclusive_bounds_at_same_value() {
        let toml = r#"
            [[rules]]
            analyte = "K"
            normal_label = "In range"
            bands = [
                { at_least = 5.0, tier = "Elevated" },
                { above = 5.0, tier = "High" },
            ]
        "#;

        let table = TomlRuleTable::from_toml_str(toml).unwrap();
        assert_eq!(table.classify("K", "5.0").tier, Tier::Elevated);
        assert_eq!(table.classify("K", "5.01").tier, Tier::High);
        assert_eq!(table.classify("K", "4.9").label, "In range");
    }

    #[test]
    fn empty_table_classifies_everything_unknown() {
        let table = TomlRuleTable::from_toml_str("").unwrap();
        assert_eq!(table.classify("AFP", "401").tier, Tier::Unknown);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert_config_error("this is not valid toml ][[[", "failed to parse rule table TOML");
    }

    #[test]
    fn rejects_duplicate_analyte_names() {
        let toml = r#"
            [[rules]]
            analyte = "AFP"

            [[rules]]
            analyte = "Tumor marker"
            aliases = ["afp"]
        "#;
        assert_config_error(toml, "declared more than once");
    }

    #[test]
    fn rejects_blank_aliases_and_group_members() {
        let blank_alias = r#"
            [[rules]]
            analyte = "AFP"
            aliases = ["  "]
            bands = [{ above = 400.0, tier = "High" }]
        "#;
        assert_config_error(blank_alias, "empty alias");

        let empty_alias = r#"
            [[rules]]
            analyte = "AFP"
            aliases = [""]
        "#;
        assert_config_error(empty_alias, "empty alias");

        let blank_member = r#"
            [[rules]]
            analyte = "ALT"

            [[groups]]
            name = "liver-function"
            members = ["ALT", " "]
        "#;
        assert_config_error(blank_member, "empty member name");
    }

    #[test]
    fn blank_names_never_match_a_rule() {
        let table = canonical();
        assert!(table.rule_for("").is_none());
        assert!(table.rule_for("   ").is_none());
        assert_eq!(table.classify("  ", "500").tier, Tier::Unknown);
    }

    #[test]
    fn rejects_band_without_single_bound() {
        let neither = r#"
            [[rules]]
            analyte = "AFP"
            bands = [{ tier = "High" }]
        "#;
        assert_config_error(neither, "exactly one of");

        let both = r#"
            [[rules]]
            analyte = "AFP"
            bands = [{ above = 1.0, at_least = 2.0, tier = "High" }]
        "#;
        assert_config_error(both, "exactly one of");
    }

    #[test]
    fn rejects_unknown_tier_band_and_infinite_bound() {
        let unknown = r#"
            [[rules]]
            analyte = "AFP"
            bands = [{ above = 1.0, tier = "Unknown" }]
        "#;
        assert_config_error(unknown, "cannot use tier Unknown");

        let infinite = r#"
            [[rules]]
            analyte = "AFP"
            bands = [{ above = inf, tier = "High" }]
        "#;
        assert_config_error(infinite, "non-finite");
    }

    #[test]
    fn rejects_duplicate_bounds() {
        let toml = r#"
            [[rules]]
            analyte = "AFP"
            bands = [
                { above = 400.0, tier = "High" },
                { above = 400.0, tier = "Critical" },
            ]
        "#;
        assert_config_error(toml, "two bands");
    }

    #[test]
    fn rejects_broken_groups() {
        let dangling = r#"
            [[rules]]
            analyte = "ALT"

            [[groups]]
            name = "liver-function"
            members = ["ALT", "GGT"]
        "#;
        assert_config_error(dangling, "'GGT' which has no rule");

        let empty = r#"
            [[rules]]
            analyte = "ALT"

            [[groups]]
            name = "liver-function"
            members = []
        "#;
        assert_config_error(empty, "has no members");

        let duplicate = r#"
            [[rules]]
            analyte = "ALT"

            [[groups]]
            name = "liver"
            members = ["ALT"]

            [[groups]]
            name = "LIVER"
            members = ["ALT"]
        "#;
        assert_config_error(duplicate, "group 'LIVER' is declared more than once");
    }

    #[test]
    fn from_file_reports_missing_path() {
        let result = TomlRuleTable::from_file(std::path::Path::new("/nonexistent/rules.toml"));
        match result {
            Err(LabsightError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read rule table"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let table = canonical();
        let text = toml::to_string(table.config()).unwrap();
        let reloaded = TomlRuleTable::from_toml_str(&text).unwrap();
        assert_eq!(reloaded.config(), table.config());
    }
}
