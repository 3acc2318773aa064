//! Assessment service: Runs one patient record through the model and rules.
//!
//! Pipeline:
//! - Validate the record
//! - Build the fixed-order feature vector
//! - Normalize with the fitted scaler
//! - Predict with the classifier
//! - Derive tier, insights and precautions
//!
//! Nothing is retried: a model failure fails the request.

use std::sync::Arc;

use crate::domain::{Assessment, PatientRecord, PredictionResult};
use crate::ports::{Classifier, FeatureScaler, ModelError};
use crate::CardiolensError;

/// Service composing the scaler and classifier ports with the rule engine.
pub struct AssessmentService<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
}

impl<S, C> AssessmentService<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Create a new assessment service.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self { scaler, classifier }
    }

    /// Predict heart-disease risk for a record.
    ///
    /// # Errors
    /// Returns `CardiolensError::Model` if the scaler or classifier fails or
    /// returns a probability outside `[0, 1]`.
    pub fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, CardiolensError> {
        tracing::debug!("Step 1: Building feature vector...");
        let features = record.to_feature_vector();

        tracing::debug!("Step 2: Normalizing features...");
        let scaled = self.scaler.transform(&features)?;

        tracing::debug!("Step 3: Running classifier...");
        let output = self.classifier.predict(&scaled)?;

        if !(0.0..=1.0).contains(&output.probability) {
            return Err(ModelError::InvalidOutput(format!(
                "probability {} outside [0, 1]",
                output.probability
            ))
            .into());
        }
        if output.label > 1 {
            return Err(ModelError::InvalidOutput(format!(
                "class label {} is not binary",
                output.label
            ))
            .into());
        }

        Ok(PredictionResult::new(output.probability * 100.0, output.label))
    }

    /// Run the full assessment for a record.
    ///
    /// # Errors
    /// Returns `CardiolensError::Validation` if the record is out of range,
    /// or any error from [`Self::predict`].
    pub fn assess(&self, record: PatientRecord) -> Result<Assessment, CardiolensError> {
        record.validate().map_err(CardiolensError::Validation)?;

        let prediction = self.predict(&record)?;
        let assessment = Assessment::new(record, prediction);

        tracing::info!(
            "Assessment complete: prediction={}, risk={:.2}%, tier={}, insights={}",
            assessment.prediction.predicted_class,
            assessment.prediction.probability,
            assessment.tier,
            assessment.insights.len()
        );

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChestPainType, RestingEcg, RiskTier, Severity, Sex, StSlope, Thalassemia,
    };
    use crate::ports::{FeatureVector, ModelOutput};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Passes features through unchanged and counts calls.
    #[derive(Default)]
    struct IdentityScaler {
        calls: AtomicUsize,
    }

    impl FeatureScaler for IdentityScaler {
        fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(*features)
        }
    }

    struct FailingScaler;

    impl FeatureScaler for FailingScaler {
        fn transform(&self, _features: &FeatureVector) -> Result<FeatureVector, ModelError> {
            Err(ModelError::InvalidOutput("scaler exploded".into()))
        }
    }

    /// Returns a fixed probability regardless of input.
    struct FixedClassifier(f64);

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<ModelOutput, ModelError> {
            Ok(ModelOutput {
                label: u8::from(self.0 >= 0.5),
                probability: self.0,
            })
        }
    }

    fn service(probability: f64) -> AssessmentService<IdentityScaler, FixedClassifier> {
        AssessmentService::new(
            Arc::new(IdentityScaler::default()),
            Arc::new(FixedClassifier(probability)),
        )
    }

    fn high_risk_record() -> PatientRecord {
        PatientRecord {
            age: 65,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 165,
            cholesterol: 250,
            fasting_blood_sugar: true,
            resting_ecg: RestingEcg::StTAbnormality,
            max_heart_rate: 55,
            exercise_angina: true,
            st_depression: 2.5,
            st_slope: StSlope::Flat,
            vessels: 2,
            thalassemia: Thalassemia::ReversibleDefect,
        }
    }

    #[test]
    fn test_probability_maps_to_tier() {
        let cases = [
            (0.10, RiskTier::Low),
            (0.30, RiskTier::Moderate),
            (0.45, RiskTier::Moderate),
            (0.60, RiskTier::High),
            (0.95, RiskTier::High),
        ];
        for (p, tier) in cases {
            let assessment = service(p)
                .assess(PatientRecord::default())
                .expect("Should assess");
            assert_eq!(assessment.tier, tier, "p = {p}");
            assert!((assessment.prediction.probability - p * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_high_risk_record_insights_independent_of_model() {
        for p in [0.01, 0.5, 0.99] {
            let assessment = service(p)
                .assess(high_risk_record())
                .expect("Should assess");
            let severities: Vec<Severity> =
                assessment.insights.iter().map(|i| i.severity).collect();
            assert_eq!(
                severities,
                vec![
                    Severity::Warning,
                    Severity::Error,
                    Severity::Error,
                    Severity::Error,
                    Severity::Warning,
                    Severity::Error,
                ]
            );
        }
    }

    #[test]
    fn test_scaler_runs_once_per_request() {
        let svc = service(0.2);
        svc.assess(PatientRecord::default()).expect("Should assess");
        assert_eq!(svc.scaler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_model_failure_propagates() {
        let svc = AssessmentService::new(Arc::new(FailingScaler), Arc::new(FixedClassifier(0.5)));
        let err = svc.assess(PatientRecord::default()).unwrap_err();
        assert!(matches!(err, CardiolensError::Model(_)));
        assert!(err.to_string().contains("scaler exploded"));
    }

    #[test]
    fn test_out_of_range_probability_is_rejected() {
        let err = service(1.5).assess(PatientRecord::default()).unwrap_err();
        assert!(matches!(
            err,
            CardiolensError::Model(ModelError::InvalidOutput(_))
        ));

        let err = service(f64::NAN)
            .assess(PatientRecord::default())
            .unwrap_err();
        assert!(matches!(err, CardiolensError::Model(_)));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let record = PatientRecord {
            age: 0,
            ..PatientRecord::default()
        };
        let err = service(0.2).assess(record).unwrap_err();
        assert!(matches!(err, CardiolensError::Validation(_)));
    }
}
