use thiserror::Error;

/// Errors surfaced by the risk engine to its immediate caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("region not found: '{key}'")]
    RegionNotFound { key: String },

    #[error("classifier unavailable: {reason}")]
    ClassifierUnavailable { reason: String },

    #[error("invalid configuration: {}", errors.join("; "))]
    InvalidConfig { errors: Vec<String> },
}

impl RiskError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RiskError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
