//! Domain layer: Core business types and logic.
//!
//! Everything here is pure: no IO, no model access, no UI. The rule
//! engine (tiers, insights, precautions) lives entirely in this layer.

mod assessment;
mod diagnosis;
mod insight;
mod patient;
mod precaution;

pub use assessment::Assessment;
pub use diagnosis::{PredictionResult, RiskTier};
pub use insight::{generate_insights, Insight, Severity};
pub use patient::{
    ChestPainType, PatientRecord, RestingEcg, Sex, StSlope, Thalassemia, FEATURE_COUNT,
    FEATURE_NAMES,
};
pub use precaution::{select_precautions, Precautions};
