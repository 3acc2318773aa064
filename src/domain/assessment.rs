//! Complete assessment handed to presenters.

use serde::Serialize;

use super::diagnosis::{PredictionResult, RiskTier};
use super::insight::{generate_insights, Insight};
use super::patient::PatientRecord;
use super::precaution::{select_precautions, Precautions};

/// Everything a presenter needs for one submitted record.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// The submitted record (echoed in the summary table)
    pub record: PatientRecord,

    /// Model output
    pub prediction: PredictionResult,

    /// Risk tier derived from the prediction
    pub tier: RiskTier,

    /// Rule-based insights from the raw inputs
    pub insights: Vec<Insight>,

    /// Precautions for the tier
    pub precautions: Precautions,

    /// When the assessment was produced
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Derive tier, insights and precautions for a record and its prediction.
    #[must_use]
    pub fn new(record: PatientRecord, prediction: PredictionResult) -> Self {
        let tier = prediction.risk_tier();
        Self {
            insights: generate_insights(&record),
            precautions: select_precautions(tier),
            tier,
            prediction,
            record,
            assessed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChestPainType, Severity};

    #[test]
    fn test_assessment_derives_from_prediction() {
        let record = PatientRecord {
            chest_pain: ChestPainType::Asymptomatic,
            ..PatientRecord::default()
        };
        let assessment = Assessment::new(record, PredictionResult::new(45.0, 0));

        assert_eq!(assessment.tier, RiskTier::Moderate);
        assert_eq!(assessment.precautions.severity, Severity::Warning);
        // Defaults: HR 150 (high), BP 120, chol 200, oldpeak 1.0, age 50.
        assert_eq!(assessment.insights.len(), 4);
    }

    #[test]
    fn test_insights_ignore_model_output() {
        let record = PatientRecord::default();
        let low = Assessment::new(record.clone(), PredictionResult::new(5.0, 0));
        let high = Assessment::new(record, PredictionResult::new(95.0, 1));
        assert_eq!(low.insights, high.insights);
        assert_ne!(low.precautions, high.precautions);
    }
}
