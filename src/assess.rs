use serde::Serialize;
use tracing::warn;

use crate::classifier::ProbabilisticAdjuster;
use crate::config::{validate_config, Config};
use crate::error::RiskError;
use crate::input::{AssessmentInput, Employment};
use crate::region::RegionRegistry;
use crate::scenario::{simulate, validate_scenarios, ScenarioConfig, ScenarioReport};
use crate::scoring::{calculate_score, validate_scoring, RiskBreakdown, ScoringConfig};

/// Result of one assessment, with the region context needed to present it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub region_key: String,
    pub region_currency: String,
    pub advisory_text: String,
    #[serde(flatten)]
    pub breakdown: RiskBreakdown,
}

/// Stateless entry point: resolves regions, scores, optionally adjusts, simulates.
///
/// Safe to share across threads; every call is a pure function of its
/// arguments and the configuration fixed at construction.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    registry: RegionRegistry,
    scoring: ScoringConfig,
    adjuster: Option<ProbabilisticAdjuster>,
    scenarios: ScenarioConfig,
}

impl RiskEngine {
    pub fn new(
        registry: RegionRegistry,
        scoring: ScoringConfig,
        adjuster: Option<ProbabilisticAdjuster>,
        scenarios: ScenarioConfig,
    ) -> Result<Self, RiskError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_scoring(&scoring) {
            errors.extend(e);
        }
        if let Err(e) = validate_scenarios(&scenarios) {
            errors.extend(e);
        }
        if !errors.is_empty() {
            return Err(RiskError::InvalidConfig { errors });
        }

        Ok(Self {
            registry,
            scoring,
            adjuster,
            scenarios,
        })
    }

    /// Build an engine from configuration, validating every section once.
    ///
    /// A classifier that cannot be loaded is logged and left out; the
    /// engine then scores with the rule-based components only.
    pub fn from_config(config: &Config) -> Result<Self, RiskError> {
        validate_config(config).map_err(|errors| RiskError::InvalidConfig { errors })?;

        let registry = RegionRegistry::new(config.regions.clone(), config.lookup_policy())?;

        let adjuster = match &config.classifier {
            Some(classifier) => match ProbabilisticAdjuster::from_config(classifier) {
                Ok(adjuster) => Some(adjuster),
                Err(e) => {
                    warn!(error = %e, "falling back to rule-based scoring");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            registry,
            scoring: config.scoring.clone(),
            adjuster,
            scenarios: config.scenarios.clone(),
        })
    }

    /// Assess a validated input.
    pub fn assess_input(&self, input: &AssessmentInput) -> Result<Assessment, RiskError> {
        let (region_key, region) = self.registry.resolve(&input.region_key)?;

        let mut breakdown = calculate_score(input, region, &self.scoring);
        if let Some(ref adjuster) = self.adjuster {
            breakdown = adjuster.adjust(&breakdown, input, region, &self.scoring);
        }

        Ok(Assessment {
            region_key: region_key.to_string(),
            region_currency: region.currency.clone(),
            advisory_text: region.advisory.clone(),
            breakdown,
        })
    }

    /// Validate raw values and assess them.
    pub fn assess(
        &self,
        income: f64,
        education_years: f64,
        employed: Employment,
        household_size: u32,
        working_members: u32,
        region_key: &str,
    ) -> Result<Assessment, RiskError> {
        let input = AssessmentInput::new(
            income,
            education_years,
            employed,
            household_size,
            working_members,
            region_key,
        )?;
        self.assess_input(&input)
    }

    /// Rank interventions for a validated input.
    pub fn simulate_input(&self, input: &AssessmentInput) -> Result<ScenarioReport, RiskError> {
        let (_, region) = self.registry.resolve(&input.region_key)?;
        Ok(simulate(input, region, &self.scoring, &self.scenarios))
    }

    /// Validate raw values and rank interventions for them.
    pub fn simulate_scenarios(
        &self,
        income: f64,
        education_years: f64,
        employed: Employment,
        household_size: u32,
        working_members: u32,
        region_key: &str,
    ) -> Result<ScenarioReport, RiskError> {
        let input = AssessmentInput::new(
            income,
            education_years,
            employed,
            household_size,
            working_members,
            region_key,
        )?;
        self.simulate_input(&input)
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn scenario_config(&self) -> &ScenarioConfig {
        &self.scenarios
    }

    pub fn has_classifier(&self) -> bool {
        self.adjuster.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierConfig;
    use crate::region::{LookupPolicy, RegionProfile};
    use crate::scoring::RiskLevel;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn config() -> Config {
        let mut regions = BTreeMap::new();
        regions.insert(
            "Testland".to_string(),
            RegionProfile {
                poverty_line: 10000.0,
                education_target: 12.0,
                currency: "TST".to_string(),
                advisory: "Visit the benefits office.".to_string(),
                dependency_cap: 4.0,
            },
        );
        Config {
            regions,
            ..Config::default()
        }
    }

    #[test]
    fn test_assess_reference_household() {
        let engine = RiskEngine::from_config(&config()).unwrap();
        let result = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 4, 1, "Testland")
            .unwrap();

        assert_eq!(result.region_key, "Testland");
        assert_eq!(result.region_currency, "TST");
        assert_eq!(result.advisory_text, "Visit the benefits office.");
        assert!((result.breakdown.total_score - 65.0).abs() < 1e-9);
        assert_eq!(result.breakdown.level, RiskLevel::High);
    }

    #[test]
    fn test_assess_unknown_region() {
        let engine = RiskEngine::from_config(&config()).unwrap();
        let err = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 4, 1, "Atlantis")
            .unwrap_err();
        assert!(matches!(err, RiskError::RegionNotFound { .. }));
    }

    #[test]
    fn test_assess_invalid_input() {
        let engine = RiskEngine::from_config(&config()).unwrap();
        let err = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 0, 1, "Testland")
            .unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { .. }));
    }

    #[test]
    fn test_unavailable_classifier_degrades() {
        let mut config = config();
        config.classifier = Some(ClassifierConfig {
            model: Some(PathBuf::from("/nonexistent/povrisk/model.json")),
            ..ClassifierConfig::default()
        });
        let engine = RiskEngine::from_config(&config).unwrap();
        assert!(!engine.has_classifier());

        let result = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 4, 1, "Testland")
            .unwrap();
        assert!(result.breakdown.classifier_probability.is_none());
        assert!((result.breakdown.total_score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_classifier_applied_when_available() {
        let mut config = config();
        config.classifier = Some(ClassifierConfig::default());
        let engine = RiskEngine::from_config(&config).unwrap();
        let result = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 4, 1, "Testland")
            .unwrap();
        assert!(result.breakdown.classifier_probability.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.scoring.weights.structural = 0.0;
        config.session.capacity = 0;
        let err = RiskEngine::from_config(&config).unwrap_err();
        match err {
            // One entry per problem, none reported twice
            RiskError::InvalidConfig { errors } => assert_eq!(errors.len(), 2, "{:?}", errors),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_invalid_scoring() {
        let registry = RegionRegistry::new(config().regions, LookupPolicy::Strict).unwrap();
        let mut scoring = ScoringConfig::default();
        scoring.weights.monetary = 10.0;
        let err = RiskEngine::new(registry, scoring, None, ScenarioConfig::default()).unwrap_err();
        assert!(matches!(err, RiskError::InvalidConfig { .. }));
    }

    #[test]
    fn test_simulate_scenarios() {
        let engine = RiskEngine::from_config(&config()).unwrap();
        let report = engine
            .simulate_scenarios(5000.0, 6.0, Employment::Flag(true), 4, 1, "Testland")
            .unwrap();
        assert_eq!(report.deltas().len(), 2);
    }

    #[test]
    fn test_assessment_json_shape() {
        let engine = RiskEngine::from_config(&config()).unwrap();
        let result = engine
            .assess(5000.0, 6.0, Employment::Flag(true), 4, 1, "Testland")
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "total_score",
            "level",
            "components",
            "comparison",
            "region_currency",
            "advisory_text",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["level"], "High");
        assert!(json["components"].get("employment").is_none());
    }
}
