use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::RiskError;

pub const DEFAULT_DEPENDENCY_CAP: f64 = 4.0;

fn default_dependency_cap() -> f64 {
    DEFAULT_DEPENDENCY_CAP
}

/// Reference constants for one region (country).
///
/// Example YAML:
/// ```yaml
/// India:
///   poverty_line: 120000
///   education_target: 10
///   currency: INR
///   advisory: "Explore PM-KISAN and skill-development schemes."
///   dependency_cap: 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegionProfile {
    /// Annual income threshold, in the region's currency
    pub poverty_line: f64,

    /// Target years of schooling
    pub education_target: f64,

    /// ISO currency code (e.g. "INR", "USD")
    pub currency: String,

    /// Advice shown alongside the assessment
    pub advisory: String,

    /// Household/worker ratio at which the structural component saturates
    #[serde(default = "default_dependency_cap")]
    pub dependency_cap: f64,
}

/// What to do when a caller asks for a region that is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// Fail with `RegionNotFound`.
    #[default]
    Strict,
    /// Substitute the named region and log the substitution.
    Fallback(String),
}

/// Read-only registry of region profiles, built once at startup.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    regions: BTreeMap<String, RegionProfile>,
    policy: LookupPolicy,
}

impl RegionRegistry {
    /// Build a registry, rejecting any profile that would make scoring ill-defined.
    pub fn new(
        regions: BTreeMap<String, RegionProfile>,
        policy: LookupPolicy,
    ) -> Result<Self, RiskError> {
        let fallback = match &policy {
            LookupPolicy::Strict => None,
            LookupPolicy::Fallback(key) => Some(key.as_str()),
        };
        if let Err(errors) = validate_regions(&regions, fallback) {
            return Err(RiskError::InvalidConfig { errors });
        }

        info!(regions = regions.len(), policy = ?policy, "region registry loaded");
        Ok(Self { regions, policy })
    }

    /// Resolve a region key to its canonical key and profile.
    ///
    /// Matching is exact first, then ASCII case-insensitive.
    pub fn resolve(&self, key: &str) -> Result<(&str, &RegionProfile), RiskError> {
        if let Some(found) = self.find(key) {
            return Ok(found);
        }

        match &self.policy {
            LookupPolicy::Strict => Err(RiskError::RegionNotFound {
                key: key.to_string(),
            }),
            LookupPolicy::Fallback(default_key) => {
                warn!(
                    requested = key,
                    substituted = %default_key,
                    "unknown region, using fallback"
                );
                self.find(default_key).ok_or_else(|| RiskError::RegionNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    fn find(&self, key: &str) -> Option<(&str, &RegionProfile)> {
        let key = key.trim();
        self.regions
            .get_key_value(key)
            .or_else(|| {
                self.regions
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(key))
            })
            .map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionProfile)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Validate region profiles at load time.
/// Returns all validation errors at once (not just the first).
pub fn validate_regions(
    regions: &BTreeMap<String, RegionProfile>,
    fallback: Option<&str>,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if regions.is_empty() {
        errors.push("regions: at least one region must be configured".to_string());
    }

    for (key, profile) in regions {
        if key.trim().is_empty() {
            errors.push("regions: region key must not be empty".to_string());
        }
        if !(profile.poverty_line.is_finite() && profile.poverty_line > 0.0) {
            errors.push(format!("regions.{}.poverty_line: must be positive", key));
        }
        if !(profile.education_target.is_finite() && profile.education_target > 0.0) {
            errors.push(format!("regions.{}.education_target: must be positive", key));
        }
        if !(profile.dependency_cap.is_finite() && profile.dependency_cap >= 1.0) {
            errors.push(format!("regions.{}.dependency_cap: must be at least 1", key));
        }
        if profile.currency.trim().is_empty() {
            errors.push(format!("regions.{}.currency: must not be empty", key));
        }
    }

    if let Some(fallback) = fallback {
        if !regions.contains_key(fallback) {
            errors.push(format!(
                "fallback_region: '{}' is not a configured region",
                fallback
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
