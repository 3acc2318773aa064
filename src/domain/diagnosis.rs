//! Prediction result and risk tier types.

use serde::{Deserialize, Serialize};

/// Risk tier for heart disease, derived from the predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Probability below 30%
    Low,
    /// Probability from 30% up to (not including) 60%
    Moderate,
    /// Probability of 60% or more
    High,
}

impl RiskTier {
    /// Lower bound (inclusive, in percent) of the moderate tier.
    pub const MODERATE_THRESHOLD: f64 = 30.0;

    /// Lower bound (inclusive, in percent) of the high tier.
    pub const HIGH_THRESHOLD: f64 = 60.0;

    /// Classify a probability percentage in `[0, 100]`.
    ///
    /// Boundaries resolve upward: 30 is moderate, 60 is high.
    #[must_use]
    pub fn classify(probability: f64) -> Self {
        if probability < Self::MODERATE_THRESHOLD {
            Self::Low
        } else if probability < Self::HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Badge label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW RISK",
            Self::Moderate => "MODERATE RISK",
            Self::High => "HIGH RISK",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Keep up heart-healthy habits",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Immediate consultation advised",
        }
    }

    /// Badge color (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (46, 204, 113),     // Green (#2ECC71)
            Self::Moderate => (241, 196, 15), // Yellow (#F1C40F)
            Self::High => (231, 76, 60),      // Red (#E74C3C)
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of the model prediction for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of heart disease, in percent (0.0 to 100.0)
    pub probability: f64,

    /// Predicted class (0 = no disease, 1 = disease present)
    pub predicted_class: u8,
}

impl PredictionResult {
    /// Create a prediction result from a percentage and a class label.
    #[must_use]
    pub fn new(probability: f64, predicted_class: u8) -> Self {
        Self {
            probability,
            predicted_class,
        }
    }

    /// Get the risk tier for this prediction.
    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::classify(self.probability)
    }

    /// Whether the classifier predicted heart disease.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.predicted_class == 1
    }

    /// Diagnosis line shown under the risk score.
    #[must_use]
    pub fn diagnosis_label(&self) -> &'static str {
        if self.is_positive() {
            "High chance of Heart Disease"
        } else {
            "Low chance of Heart Disease"
        }
    }
}
