use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Defines how the composite risk score is weighted. Weights of the
/// components in use must add up to exactly 100.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     monetary: 50
///     capability: 20
///     structural: 15
///     employment: 15
///   education: stepped
///   income_floor:
///     min_score: 35
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Component weights (default: 40/30/30, no employment component)
    #[serde(default)]
    pub weights: Weights,

    /// How the education shortfall decays toward zero
    #[serde(default)]
    pub education: EducationDecay,

    /// Below-poverty-line households never score under this floor when set
    #[serde(default)]
    pub income_floor: Option<IncomeFloor>,
}

/// Per-component weights, in points out of 100.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub monetary: f64,
    pub capability: f64,
    pub structural: f64,

    /// Optional employment component; omitted means it is not scored
    #[serde(default)]
    pub employment: Option<f64>,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            monetary: 40.0,
            capability: 30.0,
            structural: 30.0,
            employment: None,
        }
    }
}

impl Weights {
    /// 50/20/15/15 split including the employment component.
    pub fn with_employment() -> Self {
        Self {
            monetary: 50.0,
            capability: 20.0,
            structural: 15.0,
            employment: Some(15.0),
        }
    }

    pub fn total(&self) -> f64 {
        self.monetary + self.capability + self.structural + self.employment.unwrap_or(0.0)
    }
}

/// Education decay function.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EducationDecay {
    /// Shortfall relative to the region's education target
    #[default]
    Linear,
    /// Fixed milestones: 16+ years, 12+, 6+, below 6
    Stepped,
}

pub const DEFAULT_FLOOR_SCORE: f64 = 35.0;

fn default_floor_score() -> f64 {
    DEFAULT_FLOOR_SCORE
}

/// Minimum score applied to households below the poverty line.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IncomeFloor {
    #[serde(default = "default_floor_score")]
    pub min_score: f64,
}

impl Default for IncomeFloor {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_FLOOR_SCORE,
        }
    }
}
