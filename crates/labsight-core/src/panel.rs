//! The panel evaluator: classifies every observation of a lab panel.
//!
//! Evaluation is a straight map over the panel followed by a fold to the
//! worst tier.  No observation can fail the panel: an unreadable value is
//! reported as `Unknown` next to the readable ones.

use tracing::{debug, warn};

use labsight_contracts::{
    observation::{LabPanel, ObservationReport, PanelReport},
    tier::Tier,
};

use crate::traits::Classifier;

/// Runs a `Classifier` over whole panels.
pub struct PanelEvaluator<'c> {
    classifier: &'c dyn Classifier,
}

impl<'c> PanelEvaluator<'c> {
    pub fn new(classifier: &'c dyn Classifier) -> Self {
        Self { classifier }
    }

    /// Classify every observation in `panel`.
    ///
    /// Reports keep the panel's order.  An empty panel has worst tier
    /// `Normal` and needs no attention.
    pub fn evaluate(&self, panel: &LabPanel) -> PanelReport {
        let observations: Vec<ObservationReport> = panel
            .observations
            .iter()
            .map(|obs| ObservationReport {
                observation: obs.clone(),
                result: self.classifier.classify_observation(obs),
            })
            .collect();

        let worst_tier = observations
            .iter()
            .map(|r| r.result.tier)
            .fold(Tier::Normal, Tier::worst);
        let requires_attention = observations.iter().any(|r| r.result.requires_attention);

        if requires_attention {
            warn!(
                collected_on = ?panel.collected_on,
                worst_tier = %worst_tier,
                "panel has values requiring attention"
            );
        } else {
            debug!(
                collected_on = ?panel.collected_on,
                observations = observations.len(),
                worst_tier = %worst_tier,
                "panel evaluated"
            );
        }

        PanelReport {
            collected_on: panel.collected_on,
            observations,
            worst_tier,
            requires_attention,
        }
    }
}
