//! Recommended precautions per risk tier.

use serde::Serialize;

use super::diagnosis::RiskTier;
use super::insight::Severity;

/// A fixed, pre-authored list of recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Precautions {
    /// Display severity of the block
    pub severity: Severity,
    pub items: &'static [&'static str],
}

const LOW: &[&str] = &[
    "Maintain a heart-healthy diet (low sodium, low saturated fat)",
    "Exercise regularly (150 min/week moderate activity)",
    "Manage stress through meditation or yoga",
    "Routine yearly cardiovascular check-ups",
    "Monitor blood pressure and cholesterol regularly",
];

const MODERATE: &[&str] = &[
    "Monitor blood pressure weekly",
    "Reduce sodium and saturated fat intake",
    "Increase physical activity gradually",
    "Manage stress and improve sleep",
    "Consult a cardiologist for evaluation",
    "Consider aspirin therapy if recommended",
];

const HIGH: &[&str] = &[
    "Seek immediate medical attention",
    "Undergo urgent cardiac evaluation (ECG, stress test)",
    "Follow cardiologist's treatment plan strictly",
    "Take prescribed medications as directed",
    "Avoid strenuous physical activity without clearance",
    "Maintain strict diet control (low sodium, heart-healthy)",
    "Monitor vitals daily",
];

/// Select the precaution block for a tier.
#[must_use]
pub fn select_precautions(tier: RiskTier) -> Precautions {
    match tier {
        RiskTier::Low => Precautions {
            severity: Severity::Info,
            items: LOW,
        },
        RiskTier::Moderate => Precautions {
            severity: Severity::Warning,
            items: MODERATE,
        },
        RiskTier::High => Precautions {
            severity: Severity::Error,
            items: HIGH,
        },
    }
}
