use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RiskError;
use crate::input::AssessmentInput;
use crate::region::RegionProfile;
use crate::scoring::factors::dependency_load;

/// Region-normalized features: income ratio, education ratio, employed, dependency load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub income_ratio: f64,
    pub education_ratio: f64,
    pub employed: f64,
    pub dependency: f64,
}

/// Ratios are capped so extreme incomes do not dominate the logit.
const MAX_RATIO: f64 = 3.0;

impl Features {
    pub fn extract(input: &AssessmentInput, region: &RegionProfile) -> Self {
        let ratio = |value: f64, reference: f64| {
            if reference > 0.0 {
                (value / reference).clamp(0.0, MAX_RATIO)
            } else {
                0.0
            }
        };
        Self {
            income_ratio: ratio(input.income, region.poverty_line),
            education_ratio: ratio(input.education_years, region.education_target),
            employed: if input.employed.is_employed() { 1.0 } else { 0.0 },
            dependency: dependency_load(input.dependency_ratio(), region.dependency_cap),
        }
    }
}

/// Pre-fit logistic model over [`Features`].
///
/// Coefficients are opaque constants produced offline. JSON form:
/// ```json
/// { "intercept": 1.0, "income": -3.0, "education": -1.5, "employment": -1.0, "dependency": 2.0 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogisticModel {
    pub intercept: f64,
    pub income: f64,
    pub education: f64,
    pub employment: f64,
    pub dependency: f64,
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self {
            intercept: 1.0,
            income: -3.0,
            education: -1.5,
            employment: -1.0,
            dependency: 2.0,
        }
    }
}

impl LogisticModel {
    /// Load coefficients from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RiskError> {
        let content = fs::read_to_string(path).map_err(|e| RiskError::ClassifierUnavailable {
            reason: format!("cannot read model at {}: {}", path.display(), e),
        })?;
        let model: LogisticModel =
            serde_json::from_str(&content).map_err(|e| RiskError::ClassifierUnavailable {
                reason: format!("invalid model at {}: {}", path.display(), e),
            })?;
        model.check()?;
        Ok(model)
    }

    /// Reject coefficients that would produce a non-finite probability.
    pub fn check(&self) -> Result<(), RiskError> {
        let coefficients = [
            self.intercept,
            self.income,
            self.education,
            self.employment,
            self.dependency,
        ];
        if coefficients.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(RiskError::ClassifierUnavailable {
                reason: "model coefficients must be finite".to_string(),
            })
        }
    }

    pub fn logit(&self, f: &Features) -> f64 {
        self.intercept
            + self.income * f.income_ratio
            + self.education * f.education_ratio
            + self.employment * f.employed
            + self.dependency * f.dependency
    }

    /// Probability of poverty risk in [0, 1].
    pub fn probability(&self, f: &Features) -> f64 {
        1.0 / (1.0 + (-self.logit(f)).exp())
    }
}
