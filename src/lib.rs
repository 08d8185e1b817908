//! Household poverty-risk scoring.
//!
//! A [`RiskEngine`] resolves a region's reference constants, computes a
//! weighted composite score (monetary, capability, structural and optional
//! employment components), optionally blends in a pre-fit classifier, and
//! ranks what-if interventions. Rolling per-session statistics live in a
//! caller-owned [`SessionStore`].

pub mod assess;
pub mod classifier;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod region;
pub mod scenario;
pub mod scoring;
pub mod session;

pub use assess::{Assessment, RiskEngine};
pub use error::RiskError;
pub use input::{AssessmentForm, AssessmentInput, Employment};
pub use region::{LookupPolicy, RegionProfile, RegionRegistry};
pub use scoring::{Comparison, RiskBreakdown, RiskLevel};
pub use session::{SessionStats, SessionStore};
