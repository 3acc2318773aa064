//! Manifest writer for Cardiolens model directories.
//!
//! Hashes `heart_scaler.json` and `heart_model.json` and writes
//! `manifest.json` next to them, so the dashboard can verify the artifacts
//! at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir>
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use cardiolens::adapters::model::manifest::{self, MANIFEST_FILE};
use cardiolens::adapters::model::{MODEL_FILE, SCALER_FILE};

fn usage() -> String {
    "Usage: write_manifest <model_dir>".to_string()
}

fn parse_args() -> Result<PathBuf, String> {
    let mut model_dir: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            _ if model_dir.is_none() => model_dir = Some(PathBuf::from(arg)),
            _ => return Err(usage()),
        }
    }

    model_dir.ok_or_else(usage)
}

fn main() -> Result<(), String> {
    let model_dir = parse_args()?;

    let model_dir = if model_dir.is_file() {
        model_dir
            .parent()
            .ok_or_else(|| "Model path has no parent directory".to_string())?
            .to_path_buf()
    } else {
        model_dir
    };

    let manifest = manifest::build(&model_dir, &[SCALER_FILE, MODEL_FILE])
        .map_err(|e| e.to_string())?;

    let mut bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize {MANIFEST_FILE}: {e}"))?;
    bytes.push(b'\n');

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    println!("Wrote manifest: {manifest_path:?}");
    for (file, digest) in &manifest.files {
        println!("  {file}  sha256={digest}");
    }

    Ok(())
}
