use serde::Serialize;

use super::config::EducationDecay;

/// Scores below this are Low.
pub const MEDIUM_THRESHOLD: f64 = 35.0;
/// Scores at or above this are High.
pub const HIGH_THRESHOLD: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < MEDIUM_THRESHOLD => RiskLevel::Low,
            s if s < HIGH_THRESHOLD => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Household-facing tier name for the same band.
    pub fn tier(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Resilient",
            RiskLevel::Medium => "At-Risk",
            RiskLevel::High => "Vulnerable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    BelowRegionAverage,
    AboveRegionAverage,
}

impl Comparison {
    pub fn from_income(income: f64, poverty_line: f64) -> Self {
        if income >= poverty_line {
            Comparison::AboveRegionAverage
        } else {
            Comparison::BelowRegionAverage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Comparison::BelowRegionAverage => "below region average",
            Comparison::AboveRegionAverage => "above region average",
        }
    }
}

/// Normalized income shortfall in [0, 1]. A non-positive line counts as full deficit.
pub fn deficit_ratio(income: f64, poverty_line: f64) -> f64 {
    if poverty_line <= 0.0 {
        return 1.0;
    }
    ((poverty_line - income) / poverty_line).clamp(0.0, 1.0)
}

impl EducationDecay {
    /// Education shortfall in [0, 1].
    pub fn gap(&self, education_years: f64, education_target: f64) -> f64 {
        match self {
            EducationDecay::Linear => {
                if education_target <= 0.0 {
                    return 0.0;
                }
                ((education_target - education_years) / education_target).clamp(0.0, 1.0)
            }
            EducationDecay::Stepped => match education_years {
                y if y >= 16.0 => 0.0,
                y if y >= 12.0 => 0.2,
                y if y >= 6.0 => 0.6,
                _ => 1.0,
            },
        }
    }
}

/// Share of the structural weight used, saturating at 1 once the ratio reaches `cap`.
pub fn dependency_load(dependency_ratio: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        return 1.0;
    }
    (dependency_ratio / cap).clamp(0.0, 1.0)
}
