//! Model port: Traits for the pre-trained scaler and classifier.
//!
//! The assessment pipeline only ever sees these two traits, so it can be
//! driven by stub predictors in tests and by the exported JSON artifacts
//! in production.

use std::path::PathBuf;

use crate::domain::FEATURE_COUNT;

/// Fixed-order feature vector (see [`crate::domain::FEATURE_NAMES`]).
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Errors raised while loading or evaluating model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Integrity check failed for {file}: expected sha256 {expected}, got {actual}")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Model produced invalid output: {0}")]
    InvalidOutput(String),
}

/// Raw classifier output for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Predicted class (0 or 1)
    pub label: u8,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,
}

/// Pre-fitted feature transform applied before classification.
pub trait FeatureScaler: Send + Sync {
    /// Transform a raw feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidOutput` if the transform yields a
    /// non-finite value.
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError>;
}

/// Pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Predict class label and positive-class probability for a
    /// normalized feature vector.
    ///
    /// # Errors
    /// Returns error if the model cannot evaluate the input.
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError>;
}
