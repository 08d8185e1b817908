use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RiskError;

/// Employment status of the household.
///
/// Accepts either a yes/no flag or a count of employed members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Employment {
    Flag(bool),
    Members(u32),
}

impl Employment {
    pub fn is_employed(&self) -> bool {
        match self {
            Employment::Flag(flag) => *flag,
            Employment::Members(n) => *n > 0,
        }
    }

    /// Parse "yes"/"no"/"true"/"false" or an employed-member count.
    pub fn parse(s: &str) -> Result<Self, RiskError> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "employed" => Ok(Employment::Flag(true)),
            "no" | "n" | "false" | "unemployed" => Ok(Employment::Flag(false)),
            other => other.parse::<u32>().map(Employment::Members).map_err(|_| {
                RiskError::invalid_input(
                    "employed",
                    format!("expected yes/no or a member count, got '{}'", s),
                )
            }),
        }
    }
}

/// A validated, request-scoped household description.
///
/// Construct through [`AssessmentInput::new`] so the clamping rules hold:
/// negative income and education are coerced to zero, `working_members`
/// is floored at one, and `household_size` must be at least one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentInput {
    pub income: f64,
    pub education_years: f64,
    pub employed: Employment,
    pub household_size: u32,
    pub working_members: u32,
    pub region_key: String,
}

impl AssessmentInput {
    pub fn new(
        income: f64,
        education_years: f64,
        employed: Employment,
        household_size: u32,
        working_members: u32,
        region_key: impl Into<String>,
    ) -> Result<Self, RiskError> {
        let income = clamp_non_negative("income", income)?;
        let education_years = clamp_non_negative("education_years", education_years)?;

        if household_size < 1 {
            return Err(RiskError::invalid_input(
                "household_size",
                "must be at least 1",
            ));
        }

        let region_key = region_key.into();
        if region_key.trim().is_empty() {
            return Err(RiskError::invalid_input("region_key", "must not be empty"));
        }

        let working_members = working_members.max(1);
        if working_members > household_size {
            debug!(
                household_size,
                working_members, "working members exceed household size; accepting as given"
            );
        }

        Ok(Self {
            income,
            education_years,
            employed,
            household_size,
            working_members,
            region_key: region_key.trim().to_string(),
        })
    }

    /// Household members per earner, never below 1.0.
    ///
    /// Earners beyond the household size count as the household size, so an
    /// all-earning household is the structural minimum.
    pub fn dependency_ratio(&self) -> f64 {
        let earners = self.working_members.min(self.household_size).max(1);
        self.household_size.max(1) as f64 / earners as f64
    }
}

fn clamp_non_negative(field: &str, value: f64) -> Result<f64, RiskError> {
    if !value.is_finite() {
        return Err(RiskError::invalid_input(field, "must be a finite number"));
    }
    Ok(value.max(0.0))
}

/// Raw, untyped assessment fields as submitted by a form or command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentForm {
    pub income: String,
    pub education_years: String,
    pub employed: String,
    pub household_size: String,
    pub working_members: String,
    pub region_key: String,
}

impl AssessmentForm {
    /// Parse every field, reporting the first one that is not numeric.
    pub fn parse(&self) -> Result<AssessmentInput, RiskError> {
        let income = parse_number("income", &self.income)?;
        let education_years = parse_number("education_years", &self.education_years)?;
        let employed = Employment::parse(&self.employed)?;
        let household_size = parse_count("household_size", &self.household_size)?;
        let working_members = parse_count("working_members", &self.working_members)?;

        AssessmentInput::new(
            income,
            education_years,
            employed,
            household_size,
            working_members,
            self.region_key.clone(),
        )
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, RiskError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| RiskError::invalid_input(field, format!("'{}' is not a number", raw.trim())))
}

fn parse_count(field: &str, raw: &str) -> Result<u32, RiskError> {
    let value = parse_number(field, raw)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RiskError::invalid_input(
            field,
            format!("'{}' is not a whole number", raw.trim()),
        ));
    }
    if value < 0.0 {
        return Ok(0);
    }
    if value > u32::MAX as f64 {
        return Err(RiskError::invalid_input(field, "is too large"));
    }
    Ok(value as u32)
}

/// One household in a batch file.
///
/// Example YAML:
/// ```yaml
/// - income: 5000
///   education_years: 6
///   employed: true
///   household_size: 4
///   working_members: 1
///   region: India
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchEntry {
    pub income: f64,
    pub education_years: f64,
    pub employed: Employment,
    pub household_size: u32,
    #[serde(default = "default_working_members")]
    pub working_members: u32,
    pub region: String,
}

fn default_working_members() -> u32 {
    1
}

impl BatchEntry {
    pub fn to_input(&self) -> Result<AssessmentInput, RiskError> {
        AssessmentInput::new(
            self.income,
            self.education_years,
            self.employed,
            self.household_size,
            self.working_members,
            self.region.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(income: &str, household: &str) -> AssessmentForm {
        AssessmentForm {
            income: income.to_string(),
            education_years: "8".to_string(),
            employed: "yes".to_string(),
            household_size: household.to_string(),
            working_members: "1".to_string(),
            region_key: "India".to_string(),
        }
    }

    #[test]
    fn test_negative_income_clamped_to_zero() {
        let input =
            AssessmentInput::new(-500.0, 10.0, Employment::Flag(true), 3, 1, "India").unwrap();
        assert_eq!(input.income, 0.0);
    }

    #[test]
    fn test_negative_education_clamped_to_zero() {
        let input =
            AssessmentInput::new(1000.0, -2.0, Employment::Flag(true), 3, 1, "India").unwrap();
        assert_eq!(input.education_years, 0.0);
    }

    #[test]
    fn test_working_members_floored_at_one() {
        let input =
            AssessmentInput::new(1000.0, 10.0, Employment::Flag(false), 4, 0, "India").unwrap();
        assert_eq!(input.working_members, 1);
        assert_eq!(input.dependency_ratio(), 4.0);
    }

    #[test]
    fn test_zero_household_rejected() {
        let err =
            AssessmentInput::new(1000.0, 10.0, Employment::Flag(true), 0, 1, "India").unwrap_err();
        assert!(
            matches!(err, RiskError::InvalidInput { ref field, .. } if field == "household_size")
        );
    }

    #[test]
    fn test_nan_income_rejected() {
        let err = AssessmentInput::new(f64::NAN, 10.0, Employment::Flag(true), 2, 1, "India")
            .unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { ref field, .. } if field == "income"));
    }

    #[test]
    fn test_empty_region_rejected() {
        let err = AssessmentInput::new(1000.0, 10.0, Employment::Flag(true), 2, 1, "  ")
            .unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { ref field, .. } if field == "region_key"));
    }

    #[test]
    fn test_working_members_above_household_accepted() {
        let input =
            AssessmentInput::new(1000.0, 10.0, Employment::Flag(true), 2, 5, "India").unwrap();
        assert_eq!(input.working_members, 5);
        assert_eq!(input.dependency_ratio(), 1.0);
    }

    #[test]
    fn test_employment_parse() {
        assert_eq!(Employment::parse("Yes").unwrap(), Employment::Flag(true));
        assert_eq!(Employment::parse("false").unwrap(), Employment::Flag(false));
        assert_eq!(Employment::parse("2").unwrap(), Employment::Members(2));
        assert!(Employment::parse("sometimes").is_err());
        assert!(Employment::Members(1).is_employed());
        assert!(!Employment::Members(0).is_employed());
    }

    #[test]
    fn test_form_parse_valid() {
        let input = form("5000.5", "4").parse().unwrap();
        assert_eq!(input.income, 5000.5);
        assert_eq!(input.household_size, 4);
        assert!(input.employed.is_employed());
    }

    #[test]
    fn test_form_non_numeric_income() {
        let err = form("lots", "4").parse().unwrap_err();
        assert_eq!(
            err,
            RiskError::invalid_input("income", "'lots' is not a number")
        );
    }

    #[test]
    fn test_form_fractional_household() {
        let err = form("100", "2.5").parse().unwrap_err();
        assert!(
            matches!(err, RiskError::InvalidInput { ref field, .. } if field == "household_size")
        );
    }

    #[test]
    fn test_batch_entry_parse() {
        let yaml = r#"
- income: 5000
  education_years: 6
  employed: true
  household_size: 4
  region: India
- income: 9000
  education_years: 12
  employed: 2
  household_size: 5
  working_members: 2
  region: USA
"#;
        let entries: Vec<BatchEntry> = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].working_members, 1);
        assert_eq!(entries[0].employed, Employment::Flag(true));
        assert_eq!(entries[1].employed, Employment::Members(2));

        let input = entries[1].to_input().unwrap();
        assert_eq!(input.region_key, "USA");
        assert_eq!(input.dependency_ratio(), 2.5);
    }

    #[test]
    fn test_form_zero_household() {
        let err = form("100", "0").parse().unwrap_err();
        assert!(
            matches!(err, RiskError::InvalidInput { ref field, .. } if field == "household_size")
        );
    }
}
