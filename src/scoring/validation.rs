use super::config::ScoringConfig;

const WEIGHT_SUM: f64 = 100.0;
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let weights = &config.weights;

    let mut named = vec![
        ("monetary", weights.monetary),
        ("capability", weights.capability),
        ("structural", weights.structural),
    ];
    if let Some(employment) = weights.employment {
        named.push(("employment", employment));
    }

    for (name, weight) in &named {
        if !weight.is_finite() || *weight < 0.0 {
            errors.push(format!(
                "scoring.weights.{}: must be a non-negative number",
                name
            ));
        }
    }

    let total = weights.total();
    if total.is_nan() || (total - WEIGHT_SUM).abs() > WEIGHT_TOLERANCE {
        errors.push(format!(
            "scoring.weights: must sum to {} (got {})",
            WEIGHT_SUM, total
        ));
    }

    if let Some(ref floor) = config.income_floor {
        if !(0.0..=100.0).contains(&floor.min_score) {
            errors.push(format!(
                "scoring.income_floor.min_score: must be between 0 and 100 (got {})",
                floor.min_score
            ));
        }
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
    use crate::scoring::{IncomeFloor, Weights};

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
        let config = ScoringConfig {
            weights: Weights::with_employment(),
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let config = ScoringConfig {
            weights: Weights {
                monetary: 40.0,
                capability: 30.0,
                structural: 20.0,
                employment: None,
            },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must sum to 100"));
    }

    #[test]
    fn test_negative_weight() {
        let config = ScoringConfig {
            weights: Weights {
                monetary: 110.0,
                capability: -10.0,
                structural: 0.0,
                employment: None,
            },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.capability"));
    }

    #[test]
    fn test_floor_out_of_range() {
        let config = ScoringConfig {
            income_floor: Some(IncomeFloor { min_score: 120.0 }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.income_floor.min_score"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            weights: Weights {
                monetary: 40.0,
                capability: 30.0,
                structural: 30.0,
                employment: Some(f64::NAN),
            },
            income_floor: Some(IncomeFloor { min_score: -1.0 }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
