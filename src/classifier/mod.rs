pub mod model;

pub use model::{Features, LogisticModel};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::RiskError;
use crate::input::AssessmentInput;
use crate::region::RegionProfile;
use crate::scoring::{apply_income_floor, RiskBreakdown, ScoringConfig};

pub const DEFAULT_NUDGE_STRENGTH: f64 = 15.0;
const MAX_NUDGE_STRENGTH: f64 = 50.0;

fn default_nudge_strength() -> f64 {
    DEFAULT_NUDGE_STRENGTH
}

/// How the classifier probability is combined with the rule-based score.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlendPolicy {
    /// Use `p * 100` as the total score
    Replace,
    /// Shift the rule-based score by `(p - 0.5) * nudge_strength`
    #[default]
    Nudge,
}

/// Classifier configuration.
///
/// Example YAML:
/// ```yaml
/// classifier:
///   model: /etc/povrisk/model.json
///   blend: nudge
///   nudge_strength: 15
/// ```
/// Without `model` or `coefficients` the built-in coefficients are used.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Path to a JSON coefficients file
    #[serde(default)]
    pub model: Option<PathBuf>,

    /// Inline coefficients
    #[serde(default)]
    pub coefficients: Option<LogisticModel>,

    #[serde(default)]
    pub blend: BlendPolicy,

    #[serde(default = "default_nudge_strength")]
    pub nudge_strength: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            coefficients: None,
            blend: BlendPolicy::default(),
            nudge_strength: DEFAULT_NUDGE_STRENGTH,
        }
    }
}

/// Validate classifier configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_classifier(config: &ClassifierConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.model.is_some() && config.coefficients.is_some() {
        errors.push("classifier: set either 'model' or 'coefficients', not both".to_string());
    }

    if !(0.0..=MAX_NUDGE_STRENGTH).contains(&config.nudge_strength) {
        errors.push(format!(
            "classifier.nudge_strength: must be between 0 and {} (got {})",
            MAX_NUDGE_STRENGTH, config.nudge_strength
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Refines a rule-based breakdown with a pre-fit logistic classifier.
#[derive(Debug, Clone)]
pub struct ProbabilisticAdjuster {
    model: LogisticModel,
    blend: BlendPolicy,
    nudge_strength: f64,
}

impl ProbabilisticAdjuster {
    pub fn new(model: LogisticModel, blend: BlendPolicy, nudge_strength: f64) -> Self {
        Self {
            model,
            blend,
            nudge_strength,
        }
    }

    /// Build the adjuster, loading the model file when one is configured.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, RiskError> {
        let model = match (&config.model, &config.coefficients) {
            (Some(path), _) => LogisticModel::load(path)?,
            (None, Some(coefficients)) => {
                coefficients.check()?;
                coefficients.clone()
            }
            (None, None) => LogisticModel::default(),
        };
        info!(blend = ?config.blend, "classifier loaded");
        Ok(Self::new(model, config.blend, config.nudge_strength))
    }

    pub fn blend(&self) -> BlendPolicy {
        self.blend
    }

    pub fn probability(&self, input: &AssessmentInput, region: &RegionProfile) -> f64 {
        self.model.probability(&Features::extract(input, region))
    }

    /// Blend the classifier into `breakdown`.
    ///
    /// Components are left untouched; only the total and level move. The
    /// income floor is applied again afterwards so blending never lowers a
    /// below-line household under it.
    pub fn adjust(
        &self,
        breakdown: &RiskBreakdown,
        input: &AssessmentInput,
        region: &RegionProfile,
        scoring: &ScoringConfig,
    ) -> RiskBreakdown {
        let p = self.probability(input, region);
        let mut adjusted = breakdown.clone();

        let total = match self.blend {
            BlendPolicy::Replace => p * 100.0,
            BlendPolicy::Nudge => breakdown.total_score + (p - 0.5) * self.nudge_strength,
        };
        adjusted.set_total(total);
        adjusted.classifier_probability = Some(p);
        adjusted.floor_applied = false;
        apply_income_floor(&mut adjusted, input, region, scoring);

        debug!(
            probability = p,
            before = breakdown.total_score,
            after = adjusted.total_score,
            "classifier adjustment"
        );
        adjusted
    }
}
