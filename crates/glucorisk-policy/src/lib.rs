//! GlucoRisk Policy
//!
//! Declarative risk policy mapping a diabetes probability to a tier.
//!
//! Policies are defined in YAML and specify:
//! - Named threshold profiles (two cut points each)
//! - Which profile is active
//! - A label and advisory text for every tier
//!
//! Copy changes to the advice never touch code; a policy file is swapped
//! instead.

pub mod policy;
pub mod thresholds;

pub use policy::{RiskPolicy, TierAdvice, TierTable, STANDARD_PROFILE};
pub use thresholds::ThresholdPolicy;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::policy::{RiskPolicy, TierAdvice};
    pub use crate::thresholds::ThresholdPolicy;
}
