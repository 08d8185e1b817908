use serde::Serialize;
use tracing::debug;

use super::config::ScoringConfig;
use super::factors::{dependency_load, deficit_ratio, Comparison, RiskLevel};
use crate::input::AssessmentInput;
use crate::region::RegionProfile;

/// Points contributed by each dimension. Each is bounded by its weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    pub monetary: f64,
    pub capability: f64,
    pub structural: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment: Option<f64>,
}

impl Components {
    pub fn sum(&self) -> f64 {
        self.monetary + self.capability + self.structural + self.employment.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBreakdown {
    pub components: Components,
    pub total_score: f64,
    pub level: RiskLevel,
    pub comparison: Comparison,
    /// True when the income floor raised the score
    pub floor_applied: bool,
    /// Classifier probability, when a probabilistic adjustment was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier_probability: Option<f64>,
}

impl RiskBreakdown {
    /// Replace the total, clamping to [0, 100] and re-deriving the level.
    pub fn set_total(&mut self, total: f64) {
        self.total_score = total.clamp(0.0, 100.0);
        self.level = RiskLevel::from_score(self.total_score);
    }
}

pub fn calculate_score(
    input: &AssessmentInput,
    region: &RegionProfile,
    config: &ScoringConfig,
) -> RiskBreakdown {
    let weights = &config.weights;

    // Monetary: income shortfall against the poverty line
    let monetary = deficit_ratio(input.income, region.poverty_line) * weights.monetary;

    // Capability: education shortfall
    let capability = config
        .education
        .gap(input.education_years, region.education_target)
        * weights.capability;

    // Structural: members per earner, saturating at the region's cap
    let structural =
        dependency_load(input.dependency_ratio(), region.dependency_cap) * weights.structural;

    // Employment: all-or-nothing when configured
    let employment = weights.employment.map(|w| {
        if input.employed.is_employed() {
            0.0
        } else {
            w
        }
    });

    let components = Components {
        monetary,
        capability,
        structural,
        employment,
    };

    let total_score = components.sum().clamp(0.0, 100.0);
    let mut breakdown = RiskBreakdown {
        level: RiskLevel::from_score(total_score),
        comparison: Comparison::from_income(input.income, region.poverty_line),
        components,
        total_score,
        floor_applied: false,
        classifier_probability: None,
    };

    apply_income_floor(&mut breakdown, input, region, config);

    debug!(
        region = %input.region_key,
        monetary = breakdown.components.monetary,
        capability = breakdown.components.capability,
        structural = breakdown.components.structural,
        employment = ?breakdown.components.employment,
        total = breakdown.total_score,
        level = breakdown.level.label(),
        "scored assessment"
    );

    breakdown
}

/// Raise the score of a below-line household to the configured floor.
pub fn apply_income_floor(
    breakdown: &mut RiskBreakdown,
    input: &AssessmentInput,
    region: &RegionProfile,
    config: &ScoringConfig,
) {
    let Some(floor) = &config.income_floor else {
        return;
    };
    if input.income < region.poverty_line && breakdown.total_score < floor.min_score {
        breakdown.set_total(floor.min_score);
        breakdown.floor_applied = true;
    }
}
