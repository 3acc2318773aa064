//! Standard (z-score) scaler fitted by the training pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{FeatureScaler, FeatureVector, ModelError};

use super::check_feature_names;

/// Exported scaler parameters: `x_norm = (x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check shape and values of the exported parameters.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` on feature-name mismatch, wrong
    /// lengths, non-finite values or a zero scale.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_feature_names("scaler", &self.feature_names)?;

        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler: expected {FEATURE_COUNT} means and scales, got {} and {}",
                self.mean.len(),
                self.scale.len()
            )));
        }

        for (i, (&mean, &scale)) in self.mean.iter().zip(&self.scale).enumerate() {
            if !mean.is_finite() {
                return Err(ModelError::InvalidArtifact(format!(
                    "scaler: mean of {} is not finite",
                    self.feature_names[i]
                )));
            }
            if !scale.is_finite() || scale == 0.0 {
                return Err(ModelError::InvalidArtifact(format!(
                    "scaler: scale of {} must be finite and non-zero, got {scale}",
                    self.feature_names[i]
                )));
            }
        }

        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler: expected {FEATURE_COUNT} means and scales, got {} and {}",
                self.mean.len(),
                self.scale.len()
            )));
        }

        let mut out = [0.0; FEATURE_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            let v = (features[i] - self.mean[i]) / self.scale[i];
            if !v.is_finite() {
                return Err(ModelError::InvalidOutput(format!(
                    "scaled {} is not finite",
                    FEATURE_NAMES[i]
                )));
            }
            *slot = v;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> StandardScaler {
        StandardScaler {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            mean: vec![50.0; FEATURE_COUNT],
            scale: vec![10.0; FEATURE_COUNT],
        }
    }

    #[test]
    fn test_transform() {
        let s = scaler();
        s.validate().expect("valid scaler");

        let mut x = [50.0; FEATURE_COUNT];
        x[0] = 70.0;
        x[1] = 45.0;
        let out = s.transform(&x).expect("transform");
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] + 0.5).abs() < 1e-12);
        assert!(out[2].abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut s = scaler();
        s.scale[4] = 0.0;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("chol"));
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        let mut s = scaler();
        s.mean.pop();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_transform_unvalidated_short_scaler_errors() {
        let mut s = scaler();
        s.scale.truncate(3);
        assert!(matches!(
            s.transform(&[50.0; FEATURE_COUNT]),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_transform_rejects_non_finite_input() {
        let mut x = [50.0; FEATURE_COUNT];
        x[9] = f64::INFINITY;
        assert!(matches!(
            scaler().transform(&x),
            Err(ModelError::InvalidOutput(_))
        ));
    }
}
