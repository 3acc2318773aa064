//! Logistic-regression classifier with optional isotonic calibration.

use serde::{Deserialize, Serialize};

use crate::domain::FEATURE_COUNT;
use crate::ports::{Classifier, FeatureVector, ModelError, ModelOutput};

use super::check_feature_names;

fn default_threshold() -> f64 {
    0.5
}

/// Exported classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,

    /// Decision threshold on the (calibrated) probability
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub calibration: Option<IsotonicCalibration>,
}

/// Piecewise-linear isotonic calibration map from raw to calibrated
/// probability. Inputs outside the breakpoints clamp to the end values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsotonicCalibration {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl IsotonicCalibration {
    fn validate(&self) -> Result<(), ModelError> {
        if self.x.len() < 2 || self.x.len() != self.y.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "calibration: need at least 2 matching breakpoints, got {} x and {} y",
                self.x.len(),
                self.y.len()
            )));
        }
        let in_unit = |v: &f64| (0.0..=1.0).contains(v);
        if !self.x.iter().all(in_unit) || !self.y.iter().all(in_unit) {
            return Err(ModelError::InvalidArtifact(
                "calibration: breakpoints must lie in [0, 1]".into(),
            ));
        }
        let monotone = |v: &[f64]| v.windows(2).all(|w| w[0] <= w[1]);
        if !monotone(&self.x) || !monotone(&self.y) {
            return Err(ModelError::InvalidArtifact(
                "calibration: breakpoints must be non-decreasing".into(),
            ));
        }
        Ok(())
    }

    /// Map a raw probability to its calibrated value.
    ///
    /// Breakpoints are expected to have passed validation; an empty or
    /// mismatched set leaves `p` unchanged.
    #[must_use]
    pub fn apply(&self, p: f64) -> f64 {
        if self.x.is_empty() || self.x.len() != self.y.len() {
            return p;
        }
        let last = self.x.len() - 1;
        if p <= self.x[0] {
            return self.y[0];
        }
        if p >= self.x[last] {
            return self.y[last];
        }

        // First breakpoint strictly greater than p; 1..=last here.
        let hi = self.x.partition_point(|&x| x <= p);
        let lo = hi - 1;
        let span = self.x[hi] - self.x[lo];
        if span <= 0.0 {
            return self.y[hi];
        }
        let t = (p - self.x[lo]) / span;
        self.y[lo] + t * (self.y[hi] - self.y[lo])
    }
}

impl LogisticClassifier {
    /// Check shape and values of the exported parameters.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if the artifact is unusable.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_feature_names("classifier", &self.feature_names)?;

        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier: expected {FEATURE_COUNT} coefficients, got {}",
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || !self.coefficients.iter().all(|c| c.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "classifier: coefficients and intercept must be finite".into(),
            ));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier: threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if let Some(calibration) = &self.calibration {
            calibration.validate()?;
        }
        Ok(())
    }

    /// Linear decision function.
    fn decision(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier: expected {FEATURE_COUNT} coefficients, got {}",
                self.coefficients.len()
            )));
        }

        let z = self.decision(features);
        if !z.is_finite() {
            return Err(ModelError::InvalidOutput(format!(
                "decision function is not finite ({z})"
            )));
        }

        let raw = sigmoid(z);
        let probability = match &self.calibration {
            Some(calibration) => {
                calibration.validate()?;
                calibration.apply(raw)
            }
            None => raw,
        };

        Ok(ModelOutput {
            label: u8::from(probability >= self.threshold),
            probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEATURE_NAMES;

    fn classifier(calibration: Option<IsotonicCalibration>) -> LogisticClassifier {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 1.0;
        LogisticClassifier {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients,
            intercept: 0.0,
            threshold: 0.5,
            calibration,
        }
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }

    #[test]
    fn test_predict_uncalibrated() {
        let model = classifier(None);
        model.validate().expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        let at_zero = model.predict(&x).expect("predict");
        assert!((at_zero.probability - 0.5).abs() < 1e-12);
        assert_eq!(at_zero.label, 1);

        x[0] = -3.0;
        let negative = model.predict(&x).expect("predict");
        assert!(negative.probability < 0.1);
        assert_eq!(negative.label, 0);
    }

    #[test]
    fn test_calibration_interpolates_and_clamps() {
        let cal = IsotonicCalibration {
            x: vec![0.2, 0.6, 0.8],
            y: vec![0.1, 0.3, 0.9],
        };
        cal.validate().expect("valid calibration");

        assert!((cal.apply(0.0) - 0.1).abs() < 1e-12);
        assert!((cal.apply(0.4) - 0.2).abs() < 1e-12);
        assert!((cal.apply(0.6) - 0.3).abs() < 1e-12);
        assert!((cal.apply(0.7) - 0.6).abs() < 1e-12);
        assert!((cal.apply(1.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_calibrated_prediction() {
        let model = classifier(Some(IsotonicCalibration {
            x: vec![0.0, 1.0],
            y: vec![0.0, 0.4],
        }));
        let out = model.predict(&[0.0; FEATURE_COUNT]).expect("predict");
        assert!((out.probability - 0.2).abs() < 1e-12);
        assert_eq!(out.label, 0);
    }

    #[test]
    fn test_validate_rejects_bad_artifacts() {
        let mut bad_names = classifier(None);
        bad_names.feature_names.swap(0, 1);
        assert!(bad_names.validate().is_err());

        let mut bad_threshold = classifier(None);
        bad_threshold.threshold = 0.0;
        assert!(bad_threshold.validate().is_err());

        let decreasing = classifier(Some(IsotonicCalibration {
            x: vec![0.0, 0.5, 1.0],
            y: vec![0.0, 0.6, 0.5],
        }));
        assert!(decreasing.validate().is_err());
    }

    #[test]
    fn test_unvalidated_shapes_error_instead_of_panicking() {
        let mut short = classifier(None);
        short.coefficients.truncate(5);
        assert!(matches!(
            short.predict(&[0.0; FEATURE_COUNT]),
            Err(ModelError::InvalidArtifact(_))
        ));

        let empty = IsotonicCalibration {
            x: Vec::new(),
            y: Vec::new(),
        };
        assert!((empty.apply(0.3) - 0.3).abs() < f64::EPSILON);

        let model = classifier(Some(empty));
        assert!(matches!(
            model.predict(&[0.0; FEATURE_COUNT]),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_threshold_defaults_when_absent() {
        let json = serde_json::json!({
            "feature_names": FEATURE_NAMES,
            "coefficients": vec![0.0; FEATURE_COUNT],
            "intercept": -1.0,
        });
        let model: LogisticClassifier = serde_json::from_value(json).expect("deserialize");
        assert!((model.threshold - 0.5).abs() < f64::EPSILON);
        assert!(model.calibration.is_none());
    }
}
