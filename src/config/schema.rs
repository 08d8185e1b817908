use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classifier::ClassifierConfig;
use crate::region::{LookupPolicy, RegionProfile};
use crate::scenario::ScenarioConfig;
use crate::scoring::ScoringConfig;
use crate::session::SessionConfig;

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// regions:
///   USA:
///     poverty_line: 15060
///     education_target: 12
///     currency: USD
///     advisory: "Check eligibility for SNAP."
/// fallback_region: USA
/// scoring:
///   education: stepped
/// classifier:
///   blend: nudge
/// session:
///   capacity: 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "builtin_regions")]
    pub regions: BTreeMap<String, RegionProfile>,

    /// Region substituted for unknown keys; unset means unknown keys are an error
    #[serde(default)]
    pub fallback_region: Option<String>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Enables the probabilistic adjustment when present
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,

    #[serde(default)]
    pub scenarios: ScenarioConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: builtin_regions(),
            fallback_region: None,
            scoring: ScoringConfig::default(),
            classifier: None,
            scenarios: ScenarioConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn lookup_policy(&self) -> LookupPolicy {
        match &self.fallback_region {
            Some(key) => LookupPolicy::Fallback(key.clone()),
            None => LookupPolicy::Strict,
        }
    }
}

fn region(
    poverty_line: f64,
    education_target: f64,
    currency: &str,
    dependency_cap: f64,
    advisory: &str,
) -> RegionProfile {
    RegionProfile {
        poverty_line,
        education_target,
        currency: currency.to_string(),
        advisory: advisory.to_string(),
        dependency_cap,
    }
}

/// Regions available when no configuration file is present. Annual figures.
pub fn builtin_regions() -> BTreeMap<String, RegionProfile> {
    BTreeMap::from([
        (
            "Brazil".to_string(),
            region(
                7200.0,
                9.0,
                "BRL",
                5.0,
                "Register with CadÚnico and check Bolsa Família eligibility.",
            ),
        ),
        (
            "India".to_string(),
            region(
                120000.0,
                10.0,
                "INR",
                5.0,
                "Check eligibility for PM-KISAN, MGNREGA and Skill India programmes.",
            ),
        ),
        (
            "Kenya".to_string(),
            region(
                60000.0,
                8.0,
                "KES",
                5.0,
                "Explore Inua Jamii cash transfers and TVET bursaries.",
            ),
        ),
        (
            "UK".to_string(),
            region(
                12570.0,
                13.0,
                "GBP",
                4.0,
                "Check Universal Credit entitlement and local council support.",
            ),
        ),
        (
            "USA".to_string(),
            region(
                15060.0,
                12.0,
                "USD",
                4.0,
                "Check eligibility for SNAP, Medicaid and the Earned Income Tax Credit.",
            ),
        ),
    ])
}
