//! What-if analysis: rescore perturbed copies of an input and rank interventions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::input::{AssessmentInput, Employment};
use crate::region::RegionProfile;
use crate::scoring::{calculate_score, ScoringConfig};

fn default_income_raise_pct() -> f64 {
    20.0
}

fn default_education_years() -> f64 {
    2.0
}

/// Size of each candidate intervention.
///
/// Example YAML:
/// ```yaml
/// scenarios:
///   income_raise_pct: 20
///   education_years: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default = "default_income_raise_pct")]
    pub income_raise_pct: f64,

    #[serde(default = "default_education_years")]
    pub education_years: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            income_raise_pct: default_income_raise_pct(),
            education_years: default_education_years(),
        }
    }
}

/// Candidate interventions, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    RaiseIncome,
    AddEducation,
    SecureEmployment,
}

impl Intervention {
    pub fn name(&self) -> &'static str {
        match self {
            Intervention::RaiseIncome => "raise_income",
            Intervention::AddEducation => "add_education",
            Intervention::SecureEmployment => "secure_employment",
        }
    }

    pub fn describe(&self, config: &ScenarioConfig) -> String {
        match self {
            Intervention::RaiseIncome => format!("Raise income by {}%", config.income_raise_pct),
            Intervention::AddEducation => {
                format!("Add {} years of education", config.education_years)
            }
            Intervention::SecureEmployment => "Secure employment".to_string(),
        }
    }

    fn apply(&self, input: &AssessmentInput, config: &ScenarioConfig) -> AssessmentInput {
        let mut perturbed = input.clone();
        match self {
            Intervention::RaiseIncome => {
                perturbed.income *= 1.0 + config.income_raise_pct / 100.0;
            }
            Intervention::AddEducation => {
                perturbed.education_years += config.education_years;
            }
            Intervention::SecureEmployment => {
                perturbed.employed = match input.employed {
                    Employment::Flag(_) => Employment::Flag(true),
                    Employment::Members(n) => Employment::Members(n.max(1)),
                };
            }
        }
        perturbed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionOutcome {
    pub intervention: Intervention,
    pub perturbed_score: f64,
    /// Baseline minus perturbed score; positive means risk goes down
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub baseline: f64,
    pub outcomes: Vec<InterventionOutcome>,
    pub recommended: Intervention,
}

impl ScenarioReport {
    /// Intervention name to risk delta.
    pub fn deltas(&self) -> BTreeMap<&'static str, f64> {
        self.outcomes
            .iter()
            .map(|o| (o.intervention.name(), o.delta))
            .collect()
    }

    pub fn outcome(&self, intervention: Intervention) -> Option<&InterventionOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.intervention == intervention)
    }
}

/// Rescore `input` under each applicable intervention.
///
/// The employment intervention is only considered when the employment
/// component is scored and the household is currently unemployed.
pub fn simulate(
    input: &AssessmentInput,
    region: &RegionProfile,
    scoring: &ScoringConfig,
    config: &ScenarioConfig,
) -> ScenarioReport {
    let baseline = calculate_score(input, region, scoring).total_score;

    let mut candidates = vec![Intervention::RaiseIncome, Intervention::AddEducation];
    if scoring.weights.employment.is_some() && !input.employed.is_employed() {
        candidates.push(Intervention::SecureEmployment);
    }

    let outcomes: Vec<InterventionOutcome> = candidates
        .into_iter()
        .map(|intervention| {
            let perturbed = intervention.apply(input, config);
            let perturbed_score = calculate_score(&perturbed, region, scoring).total_score;
            InterventionOutcome {
                intervention,
                perturbed_score,
                delta: baseline - perturbed_score,
            }
        })
        .collect();

    // Strictly greater wins, so ties keep the earlier (monetary first) candidate
    let mut recommended = &outcomes[0];
    for outcome in &outcomes[1..] {
        if outcome.delta > recommended.delta {
            recommended = outcome;
        }
    }
    let recommended = recommended.intervention;

    debug!(
        baseline,
        recommended = recommended.name(),
        "simulated interventions"
    );

    ScenarioReport {
        baseline,
        outcomes,
        recommended,
    }
}

/// Validate scenario configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scenarios(config: &ScenarioConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(config.income_raise_pct.is_finite() && config.income_raise_pct > 0.0) {
        errors.push("scenarios.income_raise_pct: must be positive".to_string());
    }
    if !(config.education_years.is_finite() && config.education_years > 0.0) {
        errors.push("scenarios.education_years: must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Weights;

    fn region() -> RegionProfile {
        RegionProfile {
            poverty_line: 10000.0,
            education_target: 12.0,
            currency: "USD".to_string(),
            advisory: String::new(),
            dependency_cap: 4.0,
        }
    }

    fn input(income: f64, education: f64, employed: bool) -> AssessmentInput {
        AssessmentInput::new(income, education, Employment::Flag(employed), 4, 1, "Testland")
            .unwrap()
    }

    #[test]
    fn test_reference_deltas() {
        let report = simulate(
            &input(5000.0, 6.0, true),
            &region(),
            &ScoringConfig::default(),
            &ScenarioConfig::default(),
        );
        assert!((report.baseline - 65.0).abs() < 1e-9);

        // 6000 income: monetary 0.4 * 40 = 16, delta 4
        let income = report.outcome(Intervention::RaiseIncome).unwrap();
        assert!((income.delta - 4.0).abs() < 1e-9);

        // 8 years: capability (4/12) * 30 = 10, delta 5
        let education = report.outcome(Intervention::AddEducation).unwrap();
        assert!((education.delta - 5.0).abs() < 1e-9);

        assert_eq!(report.recommended, Intervention::AddEducation);
        assert_eq!(report.deltas().len(), 2);
    }

    #[test]
    fn test_income_preferred_when_larger() {
        let report = simulate(
            &input(2000.0, 11.5, true),
            &region(),
            &ScoringConfig::default(),
            &ScenarioConfig::default(),
        );
        assert_eq!(report.recommended, Intervention::RaiseIncome);
    }

    #[test]
    fn test_tie_favors_income() {
        // Already above the line and past the education target: both deltas are zero
        let report = simulate(
            &input(50000.0, 16.0, true),
            &region(),
            &ScoringConfig::default(),
            &ScenarioConfig::default(),
        );
        assert!(report.outcomes.iter().all(|o| o.delta == 0.0));
        assert_eq!(report.recommended, Intervention::RaiseIncome);
    }

    #[test]
    fn test_employment_candidate_when_unemployed() {
        let scoring = ScoringConfig {
            weights: Weights::with_employment(),
            ..ScoringConfig::default()
        };
        let report = simulate(
            &input(9500.0, 11.0, false),
            &region(),
            &scoring,
            &ScenarioConfig::default(),
        );
        let employment = report.outcome(Intervention::SecureEmployment).unwrap();
        assert!((employment.delta - 15.0).abs() < 1e-9);
        assert_eq!(report.recommended, Intervention::SecureEmployment);
    }

    #[test]
    fn test_no_employment_candidate_when_employed() {
        let scoring = ScoringConfig {
            weights: Weights::with_employment(),
            ..ScoringConfig::default()
        };
        let report = simulate(
            &input(5000.0, 6.0, true),
            &region(),
            &scoring,
            &ScenarioConfig::default(),
        );
        assert!(report.outcome(Intervention::SecureEmployment).is_none());
    }

    #[test]
    fn test_original_input_untouched() {
        let original = input(5000.0, 6.0, true);
        let copy = original.clone();
        let _ = simulate(
            &original,
            &region(),
            &ScoringConfig::default(),
            &ScenarioConfig::default(),
        );
        assert_eq!(original, copy);
    }

    #[test]
    fn test_validate_scenarios() {
        assert!(validate_scenarios(&ScenarioConfig::default()).is_ok());
        let errors = validate_scenarios(&ScenarioConfig {
            income_raise_pct: 0.0,
            education_years: -1.0,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
