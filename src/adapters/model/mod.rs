//! Model adapter: JSON artifacts exported by the training pipeline.
//!
//! A model directory holds:
//! - `heart_scaler.json`: fitted standard scaler
//! - `heart_model.json`: logistic regression, optionally isotonic-calibrated
//! - `manifest.json` (optional): SHA-256 digests binding both files
//!
//! Artifacts are loaded once at startup and are read-only afterwards.

pub mod manifest;
mod logistic;
mod scaler;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::FEATURE_NAMES;
use crate::ports::ModelError;

pub use logistic::{IsotonicCalibration, LogisticClassifier};
pub use scaler::StandardScaler;

/// Classifier artifact file name.
pub const MODEL_FILE: &str = "heart_model.json";

/// Scaler artifact file name.
pub const SCALER_FILE: &str = "heart_scaler.json";

/// Scaler and classifier loaded from one model directory.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub scaler: Arc<StandardScaler>,
    pub classifier: Arc<LogisticClassifier>,

    /// Whether the artifacts were checked against a manifest
    pub verified: bool,
}

impl ModelBundle {
    /// Load and validate both artifacts from `model_dir`.
    ///
    /// # Errors
    /// Returns error if the directory is missing, an artifact cannot be
    /// read or parsed, fails validation, or does not match the manifest.
    pub fn load(model_dir: &Path, require_manifest: bool) -> Result<Self, ModelError> {
        if !model_dir.is_dir() {
            return Err(ModelError::InvalidArtifact(format!(
                "Model directory {model_dir:?} not found. Set CARDIOLENS_MODEL_PATH to a directory containing {MODEL_FILE} and {SCALER_FILE}."
            )));
        }

        // Integrity first: never parse bytes the manifest does not vouch for.
        let manifest = manifest::verify(model_dir, require_manifest)?;

        let scaler: StandardScaler = read_artifact(&model_dir.join(SCALER_FILE))?;
        scaler.validate()?;

        let classifier: LogisticClassifier = read_artifact(&model_dir.join(MODEL_FILE))?;
        classifier.validate()?;

        tracing::info!(
            "Loaded model from {:?} (n_features={}, calibrated={}, threshold={}, verified={})",
            model_dir,
            classifier.coefficients.len(),
            classifier.calibration.is_some(),
            classifier.threshold,
            manifest.is_some()
        );

        Ok(Self {
            scaler: Arc::new(scaler),
            classifier: Arc::new(classifier),
            verified: manifest.is_some(),
        })
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Artifacts must list the record's features in model order.
pub(crate) fn check_feature_names(artifact: &str, names: &[String]) -> Result<(), ModelError> {
    let matches = names.len() == FEATURE_NAMES.len()
        && names.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b);
    if matches {
        Ok(())
    } else {
        Err(ModelError::InvalidArtifact(format!(
            "{artifact}: feature_names {names:?} do not match expected order {FEATURE_NAMES:?}"
        )))
    }
}
