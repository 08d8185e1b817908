pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{Comparison, RiskLevel, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use engine::{apply_income_floor, calculate_score, Components, RiskBreakdown};
pub use validation::validate_scoring;
