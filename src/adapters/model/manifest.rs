//! SHA-256 manifest binding the model artifacts of a directory.
//!
//! `manifest.json` maps each artifact file name to the hex digest of its
//! bytes. When a manifest is present, every file it lists is hashed and
//! compared before anything is parsed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::ModelError;

use super::{MODEL_FILE, SCALER_FILE};

/// Manifest file name inside the model directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Hash the given artifact files of `model_dir` into a manifest.
///
/// # Errors
/// Returns `ModelError::Io` if a file cannot be read.
pub fn build(model_dir: &Path, files: &[&str]) -> Result<Manifest, ModelError> {
    let mut digests = BTreeMap::new();
    for rel in files {
        let path = model_dir.join(rel);
        let bytes = fs::read(&path).map_err(|source| ModelError::Io { path, source })?;
        digests.insert((*rel).to_string(), sha256_hex(&bytes));
    }

    Ok(Manifest {
        version: MANIFEST_VERSION,
        files: digests,
    })
}

/// Verify the artifacts of `model_dir` against its manifest.
///
/// Returns `Ok(None)` when no manifest exists and `required` is false.
///
/// # Errors
/// Returns error if the manifest is required but missing, malformed, does
/// not bind both artifacts, or if any digest does not match.
pub fn verify(model_dir: &Path, required: bool) -> Result<Option<Manifest>, ModelError> {
    let manifest_path = model_dir.join(MANIFEST_FILE);

    if !manifest_path.exists() {
        if required {
            return Err(ModelError::InvalidArtifact(format!(
                "{MANIFEST_FILE} not found in {model_dir:?} and a manifest is required"
            )));
        }
        tracing::warn!(
            "No {} in {:?}; model artifacts are loaded without integrity check",
            MANIFEST_FILE,
            model_dir
        );
        return Ok(None);
    }

    let content = fs::read(&manifest_path).map_err(|source| ModelError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: Manifest =
        serde_json::from_slice(&content).map_err(|source| ModelError::Parse {
            path: manifest_path,
            source,
        })?;

    if manifest.version != MANIFEST_VERSION {
        return Err(ModelError::InvalidArtifact(format!(
            "Unsupported manifest version {} (expected {MANIFEST_VERSION})",
            manifest.version
        )));
    }

    for required_file in [MODEL_FILE, SCALER_FILE] {
        if !manifest.files.contains_key(required_file) {
            return Err(ModelError::InvalidArtifact(format!(
                "{MANIFEST_FILE} must bind {required_file}"
            )));
        }
    }

    for (rel, expected) in &manifest.files {
        // Only plain file names inside the model directory.
        if rel.contains(['/', '\\']) || rel == ".." || rel == "." {
            return Err(ModelError::InvalidArtifact(format!(
                "{MANIFEST_FILE} entry {rel:?} is not a plain file name"
            )));
        }

        let path = model_dir.join(rel);
        let bytes = fs::read(&path).map_err(|source| ModelError::Io { path, source })?;
        let actual = sha256_hex(&bytes);

        if !constant_time_eq_str(&actual, &expected.to_ascii_lowercase()) {
            return Err(ModelError::Integrity {
                file: rel.clone(),
                expected: expected.clone(),
                actual,
            });
        }
    }

    tracing::info!(
        "Verified {} model artifact(s) against {}",
        manifest.files.len(),
        MANIFEST_FILE
    );
    Ok(Some(manifest))
}

// Constant-time compare for ASCII hex digests.
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
